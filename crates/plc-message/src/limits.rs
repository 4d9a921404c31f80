//! Bounds applied to peer-supplied counts and lengths

use crate::error::{MessageError, MessageResult};
use plc_config::{Config, DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_FIELD_BYTES};
use tracing::warn;

/// Upper bounds enforced on both sides of the channel.
///
/// There is always a bound: a decoder never sizes an allocation from an
/// unchecked peer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_arguments: u32,
    max_field_bytes: u32,
}

impl Limits {
    /// `max_arguments` is clamped to `i32::MAX`, the largest count the wire can carry
    pub fn new(max_arguments: u32, max_field_bytes: u32) -> Self {
        Self {
            max_arguments: max_arguments.min(i32::MAX as u32),
            max_field_bytes,
        }
    }

    pub fn max_arguments(&self) -> u32 {
        self.max_arguments
    }

    pub fn max_field_bytes(&self) -> u32 {
        self.max_field_bytes
    }

    /// Validate a decoded `argument_count`
    pub(crate) fn check_count(&self, count: i32) -> MessageResult<usize> {
        if count < 0 || count as u32 > self.max_arguments {
            warn!(count, max = self.max_arguments, "rejecting malformed argument count");
            return Err(MessageError::MalformedCount {
                count: i64::from(count),
                max: self.max_arguments,
            });
        }
        Ok(count as usize)
    }

    /// Validate the number of arguments about to be encoded
    pub(crate) fn check_outgoing(&self, count: usize) -> MessageResult<i32> {
        if count > self.max_arguments as usize {
            return Err(MessageError::MalformedCount {
                count: i64::try_from(count).unwrap_or(i64::MAX),
                max: self.max_arguments,
            });
        }
        // max_arguments <= i32::MAX, so this cannot truncate
        Ok(count as i32)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_FIELD_BYTES)
    }
}

impl From<&Config> for Limits {
    fn from(config: &Config) -> Self {
        Self::new(config.max_arguments(), config.max_field_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1)]
    #[case(i32::MIN)]
    #[case(1_000_000_000)]
    #[case(65_536)]
    fn test_bogus_counts_rejected(#[case] count: i32) {
        let err = Limits::default().check_count(count).unwrap_err();
        assert!(matches!(err, MessageError::MalformedCount { max: 65_535, .. }));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(65_535)]
    fn test_counts_within_bound(#[case] count: i32) {
        assert_eq!(Limits::default().check_count(count).unwrap(), count as usize);
    }

    #[test]
    fn test_clamped_to_wire_width() {
        let limits = Limits::new(u32::MAX, 1);
        assert_eq!(limits.max_arguments(), i32::MAX as u32);
    }

    #[test]
    fn test_outgoing_count_checked() {
        let limits = Limits::new(2, 16);
        assert_eq!(limits.check_outgoing(2).unwrap(), 2);
        assert!(matches!(
            limits.check_outgoing(3),
            Err(MessageError::MalformedCount { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_from_default_config() {
        let limits = Limits::from(&Config::default());
        assert_eq!(limits, Limits::default());
    }
}
