mod callback;
mod handler;
mod handler_map;
mod subscriptions;

pub use callback::CallbackServicer;
pub use handler::{HandlerFn, make_handler};
pub use subscriptions::{TOPIC_KEY_DELIMITER, TopicKey};
