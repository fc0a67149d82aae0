use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rectangular region of interest in frame-pixel coordinates (TLWH format).
///
/// Width and height are always positive. The origin may be negative; whether a
/// partially out-of-frame region is acceptable is up to the tracking capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

/// Rejected region construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("region size must be positive, got {width}x{height}")]
    NonPositiveSize { width: i32, height: i32 },

    #[error("region at ({x}, {y}) with size {width}x{height} exceeds the coordinate range")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("expected `x,y,width,height`, got `{0}`")]
    Malformed(String),
}

impl Region {
    /// Create a region from its top-left corner and size.
    ///
    /// The right and bottom edges must be representable, so edge arithmetic
    /// on a constructed region never overflows.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, RegionError> {
        if width <= 0 || height <= 0 {
            return Err(RegionError::NonPositiveSize { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(RegionError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the region.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Whether the region lies entirely inside a `width` x `height` frame.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() as usize <= width
            && self.bottom() as usize <= height
    }
}

impl TryFrom<[i32; 4]> for Region {
    type Error = RegionError;

    fn try_from([x, y, width, height]: [i32; 4]) -> Result<Self, Self::Error> {
        Self::new(x, y, width, height)
    }
}

impl From<Region> for [i32; 4] {
    fn from(region: Region) -> Self {
        region.to_tlwh()
    }
}

impl FromStr for Region {
    type Err = RegionError;

    /// Parse `x,y,width,height`, whitespace around the numbers allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RegionError::Malformed(s.trim().to_string());
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<i32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        let values: [i32; 4] = values.try_into().map_err(|_| malformed())?;
        Self::try_from(values)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_size() {
        assert_eq!(
            Region::new(0, 0, 0, 10),
            Err(RegionError::NonPositiveSize {
                width: 0,
                height: 10
            })
        );
        assert!(Region::new(0, 0, 10, -1).is_err());
        assert!(Region::new(-5, -5, 10, 10).is_ok());
    }

    #[test]
    fn test_rejects_unrepresentable_edges() {
        assert_eq!(
            Region::new(2_147_483_600, 0, 100, 10),
            Err(RegionError::OutOfRange {
                x: 2_147_483_600,
                y: 0,
                width: 100,
                height: 10
            })
        );
        assert!(Region::new(0, i32::MAX, 10, 1).is_err());

        let region = Region::new(i32::MAX - 10, i32::MIN, 10, 10).unwrap();
        assert_eq!(region.right(), i32::MAX);
        assert!(!region.fits_within(usize::MAX, usize::MAX));
        assert!(Region::new(i32::MAX - 10, 0, 10, 10).unwrap().fits_within(usize::MAX, 10));
        assert!(matches!(
            "2147483600,0,100,10".parse::<Region>(),
            Err(RegionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_region_conversions() {
        let region = Region::new(10, 20, 30, 40).unwrap();

        assert_eq!(region.to_tlwh(), [10, 20, 30, 40]);
        assert_eq!((region.right(), region.bottom()), (40, 60));
        assert_eq!(region.center(), (25.0, 40.0));
        assert_eq!(<[i32; 4]>::from(region), [10, 20, 30, 40]);
        assert_eq!(Region::try_from([10, 20, 30, 40]).unwrap(), region);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            " 10, 10,50 ,50 ".parse::<Region>().unwrap(),
            Region::new(10, 10, 50, 50).unwrap()
        );
        assert!(matches!(
            "10,10,50".parse::<Region>(),
            Err(RegionError::Malformed(_))
        ));
        assert!(matches!(
            "a,b,c,d".parse::<Region>(),
            Err(RegionError::Malformed(_))
        ));
        assert!(matches!(
            "1,2,0,4".parse::<Region>(),
            Err(RegionError::NonPositiveSize { .. })
        ));
    }

    #[test]
    fn test_fits_within() {
        let region = Region::new(0, 0, 10, 10).unwrap();
        assert!(region.fits_within(10, 10));
        assert!(!region.fits_within(9, 10));
        assert!(!Region::new(-1, 0, 10, 10).unwrap().fits_within(100, 100));
    }
}
