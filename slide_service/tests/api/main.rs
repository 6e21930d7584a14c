mod delete_presentation;
mod download_presentation;
mod generate_presentation;
mod health_check;
mod helpers;
