use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, H5Type};
use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use super::error::FieldError;

/// Longest fixed-length string dataset we read; longer ones are rejected, not truncated
const MAX_FIXED_STRING: usize = 65536;

/// Parse an ISO-8601 timestamp.
///
/// Accepts a full date-time with offset, a date-time without offset (taken as UTC), or
/// a bare date (midnight UTC). A space may separate the date and the time.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let mut value = value.trim().to_string();
    if value.len() > 10 && value.is_char_boundary(10) && value[10..].starts_with(' ') {
        value.replace_range(10..11, "T");
    }

    match OffsetDateTime::parse(&value, &Iso8601::DEFAULT) {
        Ok(timestamp) => Ok(timestamp),
        Err(offset_error) => {
            if let Ok(naive) = PrimitiveDateTime::parse(&value, &Iso8601::DEFAULT) {
                Ok(naive.assume_utc())
            } else if let Ok(date) = Date::parse(&value, &Iso8601::DEFAULT) {
                Ok(date.midnight().assume_utc())
            } else {
                Err(offset_error)
            }
        }
    }
}

/// Convert a float holding a whole number within the range of `i64`
fn whole_float(value: f64) -> Result<i64, FieldError> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Ok(value as i64)
    } else {
        Err(FieldError::NotAnInteger(value))
    }
}

/// Read a single value from a dataset that is either a scalar or a one-element array
fn read_single<T: H5Type + Clone>(dataset: &Dataset) -> hdf5::Result<T> {
    if dataset.is_scalar() {
        return dataset.read_scalar::<T>();
    }
    let values = dataset.read_raw::<T>()?;
    match values.as_slice() {
        [value] => Ok(value.clone()),
        _ => Err(hdf5::Error::from(format!(
            "dataset {} holds {} values, expected one",
            dataset.name(),
            values.len()
        ))),
    }
}

fn read_fixed<const N: usize>(dataset: &Dataset, unicode: bool) -> hdf5::Result<Vec<u8>> {
    if unicode {
        Ok(read_single::<FixedUnicode<N>>(dataset)?.as_bytes().to_vec())
    } else {
        Ok(read_single::<FixedAscii<N>>(dataset)?.as_bytes().to_vec())
    }
}

/// Read a fixed-length string of `size` bytes into the smallest buffer that holds it
fn read_fixed_string(
    dataset: &Dataset,
    size: usize,
    unicode: bool,
) -> Result<Vec<u8>, FieldError> {
    let bytes = match size {
        0..=256 => read_fixed::<256>(dataset, unicode)?,
        257..=4096 => read_fixed::<4096>(dataset, unicode)?,
        4097..=MAX_FIXED_STRING => read_fixed::<MAX_FIXED_STRING>(dataset, unicode)?,
        _ => return Err(FieldError::StringTooLong(size)),
    };
    Ok(bytes)
}

/// A group of a NeXus tree.
///
/// Wraps an HDF5 group and reads its member datasets as optional values: a missing
/// member is `Ok(None)`, a member that exists but cannot be read or decoded is an
/// error.
#[derive(Debug, Clone)]
pub struct NexusGroup {
    group: hdf5::Group,
}

impl NexusGroup {
    pub fn new(group: hdf5::Group) -> Self {
        Self { group }
    }

    /// Full path of the group inside the file
    pub fn path(&self) -> String {
        self.group.name()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.group.link_exists(name)
    }

    /// Get a member group, if it exists
    pub fn subgroup(&self, name: &str) -> Option<NexusGroup> {
        if !self.contains(name) {
            return None;
        }
        self.group.group(name).ok().map(NexusGroup::new)
    }

    fn dataset(&self, name: &str) -> Result<Option<Dataset>, FieldError> {
        if !self.contains(name) {
            return Ok(None);
        }
        Ok(Some(self.group.dataset(name)?))
    }

    /// Read the raw bytes of a string dataset, whatever its HDF5 string flavor
    pub fn bytes(&self, name: &str) -> Result<Option<Vec<u8>>, FieldError> {
        let Some(dataset) = self.dataset(name)? else {
            return Ok(None);
        };
        let bytes = match dataset.dtype()?.to_descriptor()? {
            TypeDescriptor::VarLenAscii => {
                read_single::<VarLenAscii>(&dataset)?.as_bytes().to_vec()
            }
            TypeDescriptor::VarLenUnicode => {
                read_single::<VarLenUnicode>(&dataset)?.as_bytes().to_vec()
            }
            TypeDescriptor::FixedAscii(size) => read_fixed_string(&dataset, size, false)?,
            TypeDescriptor::FixedUnicode(size) => read_fixed_string(&dataset, size, true)?,
            other => return Err(FieldError::NotAString(format!("{other:?}"))),
        };
        Ok(Some(bytes))
    }

    /// Read a string dataset, decoding the stored bytes as UTF-8
    pub fn string(&self, name: &str) -> Result<Option<String>, FieldError> {
        match self.bytes(name)? {
            Some(bytes) => Ok(Some(std::str::from_utf8(&bytes)?.to_string())),
            None => Ok(None),
        }
    }

    pub fn float(&self, name: &str) -> Result<Option<f64>, FieldError> {
        match self.dataset(name)? {
            Some(dataset) => Ok(Some(read_single::<f64>(&dataset)?)),
            None => Ok(None),
        }
    }

    /// Read an integer. Floating point values are accepted when they are whole; values
    /// outside the range of `i64` are rejected rather than clamped.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, FieldError> {
        let Some(dataset) = self.dataset(name)? else {
            return Ok(None);
        };
        match dataset.dtype()?.to_descriptor()? {
            TypeDescriptor::Integer(_) => Ok(Some(read_single::<i64>(&dataset)?)),
            TypeDescriptor::Unsigned(_) => {
                let value = read_single::<u64>(&dataset)?;
                i64::try_from(value)
                    .map(Some)
                    .map_err(|_| FieldError::NotAnInteger(value as f64))
            }
            _ => whole_float(read_single::<f64>(&dataset)?).map(Some),
        }
    }

    pub fn timestamp(&self, name: &str) -> Result<Option<OffsetDateTime>, FieldError> {
        match self.string(name)? {
            Some(value) => Ok(Some(parse_timestamp(&value)?)),
            None => Ok(None),
        }
    }
}
