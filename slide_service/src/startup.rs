use actix_governor::Governor;
use actix_web::{
    dev::Server,
    web::{self, Data},
    App, HttpServer,
};
use common::helper::error_chain_fmt;
use std::{net::TcpListener, sync::Arc};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use crate::{
    adapters::pptx::PptxRenderer,
    configuration::{RateLimitSettings, Settings},
    controllers::{
        delete_presentation::delete_presentation,
        download_presentation::download_presentation,
        generate_presentation::generate_presentation, json_error::json_error_handler,
    },
    domain::services::content_resolver::ContentResolver,
    middlewares::rate_limit::{self, RouteRateLimit, ZeroRateLimitError},
    ports::{
        content_generator::{ContentGenerator, ContentGeneratorError},
        presentation_renderer::PresentationRenderer,
        presentation_store::{PresentationStore, PresentationStoreError},
    },
    repositories::{
        openai_content_generator::OpenAiContentGenerator,
        presentation_file_repository::PresentationFileRepository,
    },
    routes::health_check,
};

/// Generation requests carry up to 20 custom slides
const JSON_PAYLOAD_LIMIT: usize = 256 * 1024;

/// Holds the newly built server, and some useful properties
pub struct Application {
    server: Server,
    port: u16,
}

#[derive(thiserror::Error)]
pub enum ApplicationBuildError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Failed to open the presentation store: {0}")]
    StoreError(#[from] PresentationStoreError),
    #[error("Failed to set up the content generator: {0}")]
    ContentGeneratorError(#[from] ContentGeneratorError),
    #[error(transparent)]
    RateLimitError(#[from] ZeroRateLimitError),
}

impl std::fmt::Debug for ApplicationBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Application {
    /// # Parameters
    /// - nb_workers: number of actix-web workers
    ///   if `None`, the number of available physical CPUs is used as the worker count.
    #[tracing::instrument(name = "Building application", skip(settings))]
    pub async fn build(
        settings: Settings,
        nb_workers: Option<usize>,
    ) -> Result<Self, ApplicationBuildError> {
        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        info!(
            service = %settings.application.name,
            version = %settings.application.version,
            port,
            "Listening"
        );

        let store = PresentationFileRepository::try_new(&settings.storage.output_dir).await?;

        let remote_generator: Option<Arc<dyn ContentGenerator>> =
            if settings.content_generator.is_enabled() {
                info!(
                    model = %settings.content_generator.model,
                    "Content generation with a language model is enabled"
                );
                Some(Arc::new(OpenAiContentGenerator::new(
                    &settings.content_generator,
                )?))
            } else {
                warn!("No API key configured, slides will be generated from templates");
                None
            };

        let server = run(
            listener,
            settings,
            nb_workers,
            ContentResolver::new(remote_generator),
            Arc::new(PptxRenderer::new()),
            Arc::new(store),
        )?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// This function only returns when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        info!("Running server ...");
        self.server.await
    }
}

/// One quota per rate-limited route, shared by all workers
#[derive(Clone)]
struct RouteRateLimits {
    generate: RouteRateLimit,
    download: RouteRateLimit,
    delete: RouteRateLimit,
}

impl RouteRateLimits {
    fn try_new(settings: &RateLimitSettings) -> Result<Self, ZeroRateLimitError> {
        Ok(Self {
            generate: rate_limit::per_minute("generate", settings.generate_per_minute)?,
            download: rate_limit::per_minute("download", settings.download_per_minute)?,
            delete: rate_limit::per_minute("delete", settings.delete_per_minute)?,
        })
    }
}

/// listener: the consumer binds their own port
///
/// TracingLogger middleware: helps collecting telemetry data.
/// It generates a unique identifier for each incoming request: `request_id`.
///
/// # Parameters
/// - nb_workers: number of actix-web workers
///   if `None`, the number of available physical CPUs is used as the worker count.
pub fn run(
    listener: TcpListener,
    settings: Settings,
    nb_workers: Option<usize>,
    resolver: ContentResolver,
    renderer: Arc<dyn PresentationRenderer>,
    store: Arc<dyn PresentationStore>,
) -> Result<Server, ApplicationBuildError> {
    // Wraps the shared services in a `actix_web::Data` (`Arc`) to be able to register them
    // and access them from handlers.
    let application_settings = Data::new(settings.application);
    let resolver = Data::new(resolver);
    let renderer: Data<dyn PresentationRenderer> = Data::from(renderer);
    let store: Data<dyn PresentationStore> = Data::from(store);

    // Created outside of the factory closure, otherwise each worker would count on its own
    let rate_limits = RouteRateLimits::try_new(&settings.rate_limits)?;

    // `move` to capture variables from the surrounding environment
    let server = HttpServer::new(move || {
        let rate_limits = rate_limits.clone();

        App::new()
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_PAYLOAD_LIMIT)
                    .error_handler(json_error_handler),
            )
            .route("/", web::get().to(health_check))
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::resource("/generate")
                            .wrap(Governor::new(&rate_limits.generate))
                            .route(web::post().to(generate_presentation)),
                    )
                    .service(
                        web::resource("/download/{presentation_id}")
                            .wrap(Governor::new(&rate_limits.download))
                            .route(web::get().to(download_presentation)),
                    )
                    .service(
                        web::resource("/presentations/{presentation_id}")
                            .wrap(Governor::new(&rate_limits.delete))
                            .route(web::delete().to(delete_presentation)),
                    ),
            )
            .app_data(application_settings.clone())
            .app_data(resolver.clone())
            .app_data(renderer.clone())
            .app_data(store.clone())
    })
    .listen(listener)?;

    // If no workers were set, use the actix-web settings (number of workers = number of physical CPUs)
    if let Some(nb_workers) = nb_workers {
        return Ok(server.workers(nb_workers).run());
    }

    // No await
    Ok(server.run())
}
