//! Facts emitted by command-driven records.

use chrono::{DateTime, Utc};

/// Something that happened to a record. Types are dotted names of the form
/// `"<area>.<record>.<fact>"`, e.g. `"credits.credit.issued"`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    /// Business time of the fact.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// The event type without its final segment (`"credits.credit"`).
    fn record_type(&self) -> &'static str {
        let name = self.event_type();
        name.rsplit_once('.').map_or(name, |(record, _)| record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Issued;

    impl Event for Issued {
        fn event_type(&self) -> &'static str {
            "credits.credit.issued"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[test]
    fn record_type_drops_the_fact() {
        assert_eq!(Issued.record_type(), "credits.credit");
        assert_eq!(Issued.version(), 1);
    }
}
