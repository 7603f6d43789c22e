use std::collections::HashMap;

pub const BUFFER_SIZE_MIN: usize = 1024;
pub const BUILDER_INITIAL_MIN: usize = 256;
pub const BUILDER_SIZE_MIN: usize = 1024;
pub const GROUP_LIMIT_MIN: usize = 16;
pub const READ_LIMIT_MIN_MB: usize = 1;
pub const READ_LIMIT_DEFAULT_MB: usize = 64;

/// Sizing limits and the unit scale table used by a [`Reader`](crate::reader::Reader).
///
/// Every size is clamped up to its documented minimum on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Bytes read from the source per refill.
    pub buffer_size: usize,
    /// Initial capacity of the token scratch buffer.
    pub builder_initial: usize,
    /// Maximum length of a single token in bytes.
    pub builder_size: usize,
    /// Maximum number of values in one group.
    pub group_limit: usize,
    /// Maximum document size in MiB.
    pub read_limit_mb: usize,
    unit_scales: HashMap<String, f64>,
}

impl Configuration {
    pub fn new(
        buffer_size: usize,
        builder_size: usize,
        group_limit: usize,
        read_limit_mb: usize,
    ) -> Self {
        Self {
            buffer_size: buffer_size.max(BUFFER_SIZE_MIN),
            builder_initial: BUILDER_INITIAL_MIN,
            builder_size: builder_size.max(BUILDER_SIZE_MIN),
            group_limit: group_limit.max(GROUP_LIMIT_MIN),
            read_limit_mb: read_limit_mb.max(READ_LIMIT_MIN_MB),
            unit_scales: HashMap::new(),
        }
    }

    /// The read budget in bytes.
    pub fn read_limit_bytes(&self) -> usize {
        self.read_limit_mb.saturating_mul(1024 * 1024)
    }

    /// Registers (or replaces) the scale applied to numbers written with `postfix`.
    ///
    /// Returns `false` when the postfix is empty or starts with a digit, since
    /// it would be indistinguishable from the number it follows.
    pub fn add_unit_scale(&mut self, postfix: &str, scale: f64) -> bool {
        match postfix.as_bytes().first() {
            None => false,
            Some(b) if b.is_ascii_digit() => false,
            Some(_) => {
                self.unit_scales.insert(postfix.to_lowercase(), scale);
                true
            }
        }
    }

    pub fn remove_unit_scale(&mut self, postfix: &str) -> bool {
        self.unit_scales.remove(&postfix.to_lowercase()).is_some()
    }

    /// Scales `value` by the unit registered for `postfix`, if any.
    pub fn apply_unit_scale(&self, postfix: &str, value: f64) -> Option<f64> {
        self.unit_scales
            .get(&postfix.to_lowercase())
            .map(|scale| value * scale)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(
            BUFFER_SIZE_MIN,
            BUILDER_SIZE_MIN,
            GROUP_LIMIT_MIN,
            READ_LIMIT_DEFAULT_MB,
        )
    }
}
