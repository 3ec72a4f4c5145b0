//! Digest: per-key-type hash function used to place entries in buckets.

/// Maps a key to an unsigned integer digest.
///
/// There is deliberately no blanket implementation: using `BucketTable`
/// with a key type that does not implement `Digest` is a compile error.
///
/// Implementations must be pure and must not allocate. Keys that compare
/// equal must produce equal digests, otherwise the table can store both.
pub trait Digest {
    /// Digest of `self`; keys that compare equal must return the same value.
    fn digest(&self) -> u64;
}

macro_rules! identity_digest {
    ($($signed:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl Digest for $unsigned {
                #[inline]
                fn digest(&self) -> u64 {
                    *self as u64
                }
            }

            impl Digest for $signed {
                /// Bit pattern reinterpreted as the unsigned type of the
                /// same width, so `-1i8` digests to `0xff`.
                #[inline]
                fn digest(&self) -> u64 {
                    *self as $unsigned as u64
                }
            }
        )*
    };
}

identity_digest! {
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    isize => usize,
}

/// IEEE-754 bit pattern, except that `-0.0` digests like `0.0` since the
/// two compare equal. NaN never equals itself and is not a usable key.
impl Digest for f32 {
    #[inline]
    fn digest(&self) -> u64 {
        if *self == 0.0 {
            return 0;
        }
        self.to_bits() as u64
    }
}

/// IEEE-754 bit pattern with `-0.0` folded onto `0.0`; same caveats as `f32`.
impl Digest for f64 {
    #[inline]
    fn digest(&self) -> u64 {
        if *self == 0.0 {
            return 0;
        }
        self.to_bits()
    }
}

impl<T: Digest + ?Sized> Digest for &T {
    #[inline]
    fn digest(&self) -> u64 {
        (**self).digest()
    }
}
