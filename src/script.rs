//! Ordered drawing commands of a single page.
//!
//! Geometry is computed by the layout and stored here in millimetres. Turning
//! a [`Script`] into source text for a particular drawing language is left to
//! a formatter such as [`crate::asy::AsySource`].

use derive_more::Constructor;

use crate::config::Style;

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Placement of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::N => "N",
            Align::NE => "NE",
            Align::E => "E",
            Align::SE => "SE",
            Align::S => "S",
            Align::SW => "SW",
            Align::W => "W",
            Align::NW => "NW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Cell,
    RowHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Line { from: Point, to: Point },
    Rect { lower_left: Point, upper_right: Point },
    Label {
        text: String,
        at: Point,
        align: Align,
        font: FontRole,
    },
    Clip { lower_left: Point, upper_right: Point },
    FixedScaling { lower_left: Point, upper_right: Point },
}

#[derive(Debug, Clone)]
pub struct Script {
    pub style: Style,
    commands: Vec<Command>,
}

impl Script {
    pub fn new(style: Style) -> Self {
        Script {
            style,
            commands: Vec::new(),
        }
    }

    pub fn line(&mut self, from: Point, to: Point) -> &mut Self {
        self.commands.push(Command::Line { from, to });
        self
    }

    pub fn rect(&mut self, lower_left: Point, upper_right: Point) -> &mut Self {
        self.commands.push(Command::Rect {
            lower_left,
            upper_right,
        });
        self
    }

    pub fn label(&mut self, text: String, at: Point, align: Align, font: FontRole) -> &mut Self {
        self.commands.push(Command::Label {
            text,
            at,
            align,
            font,
        });
        self
    }

    pub fn clip(&mut self, lower_left: Point, upper_right: Point) -> &mut Self {
        self.commands.push(Command::Clip {
            lower_left,
            upper_right,
        });
        self
    }

    pub fn fixed_scaling(&mut self, lower_left: Point, upper_right: Point) -> &mut Self {
        self.commands.push(Command::FixedScaling {
            lower_left,
            upper_right,
        });
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &Point, FontRole)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Label { text, at, font, .. } => Some((text.as_str(), at, *font)),
            _ => None,
        })
    }
}
