//! Human-readable rendering of records to an output sink.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

#[derive(Debug)]
pub enum OutputError {
    Render(serde_json::Error),
    Io(std::io::Error),
}

impl Display for OutputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(err) => write!(f, "failed to render record: {err}"),
            Self::Io(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for OutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

/// Writes `value` as pretty JSON followed by a newline.
///
/// `None` renders as `null`, matching an empty lookup result.
pub fn write_record<W, T>(out: &mut W, value: &T) -> Result<(), OutputError>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let rendered = serde_json::to_string_pretty(value).map_err(OutputError::Render)?;
    writeln!(out, "{rendered}").map_err(OutputError::Io)?;
    out.flush().map_err(OutputError::Io)
}

#[cfg(test)]
mod tests {
    use super::write_record;

    #[test]
    fn empty_lookup_renders_as_null() {
        let mut out = Vec::new();
        write_record(&mut out, &Option::<u8>::None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "null\n");
    }
}
