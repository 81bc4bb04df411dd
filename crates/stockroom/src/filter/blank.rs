/// A value that counts as "not supplied" for optional filters.
///
/// Strings are blank when empty after trimming, options when `None` (or when
/// the inner value is blank) and numbers when zero. A `bool` is never blank:
/// an optional boolean filter takes `Option<bool>` and is dropped only on
/// `None`.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(Blank::is_blank)
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for rust_decimal::Decimal {
    fn is_blank(&self) -> bool {
        self.is_zero()
    }
}

macro_rules! impl_blank_int {
    ($($ty:ty),*) => {
        $(
            impl Blank for $ty {
                fn is_blank(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_blank_int!(i16, i32, i64, u32);

impl Blank for f64 {
    fn is_blank(&self) -> bool {
        *self == 0.0
    }
}
