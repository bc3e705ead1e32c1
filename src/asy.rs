use std::fmt;

use crate::config::Font;
use crate::script::{Command, FontRole, Point, Script};

const CELL_FONT: &str = "cell_font";
const ROW_HEADER_FONT: &str = "row_header_font";
const BORDER_PEN: &str = "cell_border_pen";

/// Renders a [`Script`] as Asymptote source.
pub struct AsySource<'a>(pub &'a Script);

struct Pair<'a>(&'a Point);

impl fmt::Display for Pair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}mm, {}mm)", self.0.x, self.0.y)
    }
}

struct Str<'a>(&'a str);

impl fmt::Display for Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                _ => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")
    }
}

fn font_decl(f: &mut fmt::Formatter<'_>, var: &str, font: &Font) -> fmt::Result {
    writeln!(f, "pen {} = font({}, {}mm);", var, Str(&font.name), font.size)
}

fn font_var(role: FontRole) -> &'static str {
    match role {
        FontRole::Cell => CELL_FONT,
        FontRole::RowHeader => ROW_HEADER_FONT,
    }
}

impl fmt::Display for AsySource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = &self.0.style;

        font_decl(f, ROW_HEADER_FONT, &style.row_header_font)?;
        font_decl(f, CELL_FONT, &style.cell_font)?;
        writeln!(f, "pen {} = {}pt + black;", BORDER_PEN, style.border_width)?;

        for cmd in self.0.commands() {
            match cmd {
                Command::Line { from, to } => {
                    writeln!(f, "draw({} -- {}, {});", Pair(from), Pair(to), BORDER_PEN)?
                }
                Command::Rect {
                    lower_left,
                    upper_right,
                } => writeln!(
                    f,
                    "draw(box({}, {}), {});",
                    Pair(lower_left),
                    Pair(upper_right),
                    BORDER_PEN
                )?,
                Command::Label {
                    text,
                    at,
                    align,
                    font,
                } => writeln!(
                    f,
                    "label({}, {}, {}, {});",
                    Str(text),
                    Pair(at),
                    align.as_str(),
                    font_var(*font)
                )?,
                Command::Clip {
                    lower_left,
                    upper_right,
                } => writeln!(f, "clip(box({}, {}));", Pair(lower_left), Pair(upper_right))?,
                Command::FixedScaling {
                    lower_left,
                    upper_right,
                } => writeln!(
                    f,
                    "fixedscaling({}, {});",
                    Pair(lower_left),
                    Pair(upper_right)
                )?,
            }
        }

        Ok(())
    }
}
