use std::fmt;

/// Value accepted by [`Logger::log_data`](super::Logger::log_data).
///
/// Floats print with Rust's shortest round-trip representation, so `10.75`
/// stays `10.75` and `1.0` prints as `1`. Booleans print as `true`/`false`.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Int(i128),
    Float(f32),
    Double(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Int(v) => write!(f, "{}", v),
            LogValue::Float(v) => write!(f, "{}", v),
            LogValue::Double(v) => write!(f, "{}", v),
            LogValue::Bool(v) => write!(f, "{}", v),
            LogValue::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! int_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    LogValue::Int(i128::from(value))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

// Pointer-sized integers are at most 64 bits wide, so they always fit.
impl From<usize> for LogValue {
    fn from(value: usize) -> Self {
        LogValue::Int(value as i128)
    }
}

impl From<isize> for LogValue {
    fn from(value: isize) -> Self {
        LogValue::Int(value as i128)
    }
}

impl From<f32> for LogValue {
    fn from(value: f32) -> Self {
        LogValue::Float(value)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Double(value)
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Bool(value)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}
