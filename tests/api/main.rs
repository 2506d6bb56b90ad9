mod health_check;
mod helpers;
mod messages;
mod subscribers;
