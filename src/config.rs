//! Allocator and adapter configuration.

/// Initial backing capacity of an array sequence.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Largest dense identifier the codec will expand a compact one into.
/// Guards against a short corrupt count expanding into gigabytes.
pub const DEFAULT_MAX_DENSE_LEN: usize = 1 << 20;

/// Whether identifiers are stored run-length compressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compression {
    /// Inputs are compact and decoded before generation; the result is
    /// encoded again.
    #[default]
    Enabled,
    /// Inputs and outputs are dense.
    Disabled,
}

impl Compression {
    /// Whether identifiers are in compact form.
    pub fn is_enabled(&self) -> bool {
        return *self == Compression::Enabled;
    }
}

/// Settings shared by an [`Allocator`](crate::allocator::Allocator) and the
/// sequences that own one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Form of the identifiers passed in and returned.
    pub compression: Compression,
    /// Slots an array sequence reserves up front. Zero is treated as one.
    pub initial_capacity: usize,
    /// Largest dense length a compact identifier may decode to.
    pub max_dense_len: usize,
}

impl Config {
    /// Compression on, with the default capacity and decode limit.
    pub fn new() -> Config {
        return Config {
            compression: Compression::Enabled,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_dense_len: DEFAULT_MAX_DENSE_LEN,
        };
    }

    /// Set the identifier form.
    pub fn with_compression(mut self, compression: Compression) -> Config {
        self.compression = compression;
        return self;
    }

    /// Set the initial capacity of array sequences.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Config {
        self.initial_capacity = initial_capacity;
        return self;
    }

    /// Set the decode limit in dense bytes.
    pub fn with_max_dense_len(mut self, max_dense_len: usize) -> Config {
        self.max_dense_len = max_dense_len;
        return self;
    }
}

impl Default for Config {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.compression, Compression::Enabled);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.max_dense_len, DEFAULT_MAX_DENSE_LEN);
    }

    #[test]
    fn builder() {
        let config = Config::new()
            .with_compression(Compression::Disabled)
            .with_initial_capacity(2)
            .with_max_dense_len(64);
        assert!(!config.compression.is_enabled());
        assert_eq!(config.initial_capacity, 2);
        assert_eq!(config.max_dense_len, 64);
    }
}
