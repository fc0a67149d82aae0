//! Region selection used when no saved region exists.

use std::io::{BufRead, Write};

use log::warn;

use crate::tracker::{Frame, Region};

/// Supplies the initial region for a fresh tracking target.
pub trait RegionSelector {
    /// Pick a region on `frame`. `None` means the user cancelled.
    fn select_region(&mut self, frame: &Frame) -> Option<Region>;
}

/// Selector with a pre-chosen answer, e.g. from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub Option<Region>);

impl RegionSelector for FixedSelector {
    fn select_region(&mut self, _frame: &Frame) -> Option<Region> {
        self.0
    }
}

/// Asks for `x,y,width,height` on a line-based terminal.
///
/// Malformed answers are re-prompted; an empty line or end of input cancels.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, frame: &Frame) -> std::io::Result<Option<Region>> {
        loop {
            write!(
                self.output,
                "Select the object to track in the {}x{} frame as x,y,width,height (empty to cancel): ",
                frame.width(),
                frame.height()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 || line.trim().is_empty() {
                return Ok(None);
            }
            match line.parse::<Region>() {
                Ok(region) => return Ok(Some(region)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> RegionSelector for PromptSelector<R, W> {
    fn select_region(&mut self, frame: &Frame) -> Option<Region> {
        self.ask(frame).unwrap_or_else(|err| {
            warn!("Region prompt failed: {err}");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn frame() -> Frame {
        Frame::from_gray(8, 8, vec![0; 64]).unwrap()
    }

    #[test]
    fn test_prompt_reprompts_on_malformed_input() {
        let mut output = Vec::new();
        let input = Cursor::new("oops\n1,2,0,4\n1, 2, 3, 4\n");
        let mut selector = PromptSelector::new(input, &mut output);

        assert_eq!(
            selector.select_region(&frame()),
            Some(Region::new(1, 2, 3, 4).unwrap())
        );
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Select the object").count(), 3);
    }

    #[test]
    fn test_prompt_cancels_on_empty_line_or_eof() {
        let mut selector = PromptSelector::new(Cursor::new("\n"), Vec::new());
        assert_eq!(selector.select_region(&frame()), None);

        let mut selector = PromptSelector::new(Cursor::new(""), Vec::new());
        assert_eq!(selector.select_region(&frame()), None);
    }

    #[test]
    fn test_fixed_selector() {
        let region = Region::new(0, 0, 4, 4).unwrap();
        assert_eq!(FixedSelector(Some(region)).select_region(&frame()), Some(region));
        assert_eq!(FixedSelector(None).select_region(&frame()), None);
    }
}
