//! # Message value type.
//!
//! A [`Message`] is an immutable record created on the producing side and
//! consumed by exactly one handler. The target hostname is derived from the
//! instance name at construction time and never changes afterwards.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

/// Immutable unit of work flowing through the pipeline.
///
/// Ownership passes to exactly one [`MessageHandler`](crate::MessageHandler)
/// when the consume loop pops it from the queue; no other task touches the
/// same message afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: Uuid,
    instance: Arc<str>,
    hostname: Arc<str>,
}

impl Message {
    /// Creates a message for the given instance.
    ///
    /// The target hostname is derived as `<instance>.example.net`.
    pub fn new(id: Uuid, instance: impl AsRef<str>) -> Self {
        let instance = instance.as_ref();
        let hostname = format!("{instance}.example.net");
        Self {
            id,
            instance: Arc::from(instance),
            hostname: Arc::from(hostname.as_str()),
        }
    }

    /// Creates a message with a random id and a random `host-xxxx` instance name.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let alphabet = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let suffix: String = (0..4)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();
        Self::new(Uuid::new_v4(), format!("host-{suffix}"))
    }

    /// Unique message identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name of the originating instance.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Derived target hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instance)
    }
}
