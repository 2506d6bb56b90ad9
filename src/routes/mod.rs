mod health_check;
mod messages;
mod subscribers;

pub use health_check::health_check;
pub use messages::{send_message, SendMessageError};
pub use subscribers::{create_subscriber, find_subscriber, unsubscribe_subscriber, SubscriberError};
