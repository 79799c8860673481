use super::OpacityMask;

/// An owned grid of opacity bits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BitMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BitMask {
    /// A fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Builds a mask by evaluating `opaque` on every pixel.
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(i32, i32) -> bool) -> Self {
        let mut result = Self::new(width, height);

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                result.set(x, y, opaque(x, y));
            }
        }

        result
    }

    /// Builds a mask from a row-major alpha channel.
    ///
    /// The first `width` values are the bottom row. Any non-zero alpha is opaque.
    /// Returns `None` if `alpha` does not contain exactly `width * height` values.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        if alpha.len() != width as usize * height as usize {
            return None;
        }

        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|a| *a != 0).collect(),
        })
    }

    /// Builds a mask from a text picture where `#` is opaque.
    ///
    /// Rows are listed top to bottom, as they would be displayed. Leading and trailing
    /// blank lines are ignored, the indentation common to all rows is stripped, and short
    /// rows are padded with transparent pixels.
    pub fn from_ascii(picture: &str) -> Self {
        let rows: Vec<&str> = picture
            .lines()
            .map(str::trim_end)
            .skip_while(|row| row.trim().is_empty())
            .collect();
        let nrows = rows
            .iter()
            .rposition(|row| !row.trim().is_empty())
            .map_or(0, |last| last + 1);
        let indent = rows[..nrows]
            .iter()
            .filter(|row| !row.trim().is_empty())
            .map(|row| row.len() - row.trim_start().len())
            .min()
            .unwrap_or(0);
        let rows: Vec<&str> = rows[..nrows]
            .iter()
            .map(|row| row.get(indent..).unwrap_or(""))
            .collect();

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut result = Self::new(width, height);

        for (i, row) in rows.iter().enumerate() {
            let y = height as i32 - 1 - i as i32;
            for (x, c) in row.chars().enumerate() {
                result.set(x as i32, y, c == '#');
            }
        }

        result
    }

    /// Sets the opacity of the pixel `(x, y)`.
    ///
    /// Coordinates outside of the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, opaque: bool) {
        if self.contains(x, y) {
            let id = self.linear_index(x, y);
            self.bits[id] = opaque;
        }
    }

    /// The number of opaque pixels.
    pub fn count_opaque(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    #[inline]
    fn linear_index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl OpacityMask for BitMask {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && self.bits[self.linear_index(x, y)]
    }
}
