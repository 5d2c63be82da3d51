use core::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref DIMENSION_REGEX: Regex =
        Regex::new(r"^\d+$").expect("Regex compilation error");
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("malformed size value; only one x is allowed if specifying with and height")]
    MalformedSize,
    #[error("invalid dimension '{0}' in size value; expected an integer")]
    InvalidDimension(String),
}

/// Pixel size of the clickable group indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSize {
    pub width: u32,
    pub height: u32,
}

impl IndicatorSize {
    pub fn width_px(&self) -> String {
        format!("{}px", self.width)
    }

    pub fn height_px(&self) -> String {
        format!("{}px", self.height)
    }
}

impl FromStr for IndicatorSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        match lowered.matches('x').count() {
            0 => {
                let value = parse_dimension(&lowered)?;
                Ok(Self {
                    width: value,
                    height: value,
                })
            }
            1 => {
                let (width, height) = lowered.split_once('x').ok_or(SizeError::MalformedSize)?;
                Ok(Self {
                    width: parse_dimension(width)?,
                    height: parse_dimension(height)?,
                })
            }
            _ => Err(SizeError::MalformedSize),
        }
    }
}

fn parse_dimension(value: &str) -> Result<u32, SizeError> {
    if !DIMENSION_REGEX.is_match(value) {
        return Err(SizeError::InvalidDimension(value.to_owned()));
    }
    value
        .parse()
        .map_err(|_| SizeError::InvalidDimension(value.to_owned()))
}
