use serde_json::{Number, Value};
use std::fmt::{Arguments, Result, Write};

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer.
    ///
    /// Values are written with the engine's string coercion: `null` writes
    /// nothing, arrays write each element with no separator and objects are
    /// written as JSON.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the [write!] macro itself.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => Ok(()),
            Value::Bool(bool) => write!(self.buffer, "{bool}"),
            Value::Number(number) => self.write_number(number),
            Value::String(string) => self.buffer.write_str(string),
            Value::Array(array) => array.iter().try_for_each(|item| self.write_value(item)),
            Value::Object(_) => write!(self.buffer, "{value}"),
        }
    }

    /// Write the number in its shortest decimal form.
    ///
    /// Floats without a fractional part are written without a trailing `.0`.
    fn write_number(&mut self, number: &Number) -> Result {
        if number.is_i64() || number.is_u64() {
            return write!(self.buffer, "{number}");
        }
        match number.as_f64() {
            Some(float) => write_float(self.buffer, float),
            None => write!(self.buffer, "{number}"),
        }
    }
}

/// Write an f64 the way it is presented in rendered output.
pub(crate) fn write_float(buffer: &mut (dyn Write + '_), float: f64) -> Result {
    if float.is_finite() && float.fract() == 0.0 && float.abs() < 1e21 {
        write!(buffer, "{float:.0}")
    } else {
        write!(buffer, "{float}")
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}

#[cfg(test)]
mod tests {
    use super::Pipe;
    use serde_json::{json, Value};

    fn written(value: Value) -> String {
        let mut buffer = String::new();
        Pipe::new(&mut buffer).write_value(&value).unwrap();
        buffer
    }

    #[test]
    fn test_write_scalars() {
        assert_eq!(written(json!(null)), "");
        assert_eq!(written(json!(true)), "true");
        assert_eq!(written(json!(42)), "42");
        assert_eq!(written(json!(-3)), "-3");
        assert_eq!(written(json!(2.5)), "2.5");
        assert_eq!(written(json!(4.0)), "4");
    }

    #[test]
    fn test_write_array_concatenates() {
        assert_eq!(written(json!(["a", 1, [true, null]])), "a1true");
    }

    #[test]
    fn test_write_object_as_json() {
        assert_eq!(written(json!({"a": 1})), r#"{"a":1}"#);
    }
}
