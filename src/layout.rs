use chrono::{Datelike, Days, NaiveDate};
use derive_more::Constructor;
use itertools::Itertools;
use nom::{
    character::complete::char, combinator::all_consuming, number::complete::double,
    sequence::separated_pair, IResult,
};
use std::fmt;
use std::str::FromStr;

use crate::config::Style;
use crate::error::{Error, ErrorKind, Result};
use crate::isoweek::IsoWeek;
use crate::locale::MonthNames;
use crate::script::{Align, FontRole, Point, Script};

pub const DAYS_PER_WEEK: u32 = 7;

/// Width and height in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

fn size_spec(input: &str) -> IResult<&str, (f64, f64)> {
    all_consuming(separated_pair(double, char(':'), double))(input)
}

impl FromStr for Size {
    type Err = Error;

    /// Parses `WIDTH:HEIGHT`.
    fn from_str(s: &str) -> Result<Self> {
        if s.matches(':').count() != 1 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                &format!(
                    "Size specification '{}' must contain exactly one colon",
                    s
                ),
            ));
        }

        let (_, (width, height)) = size_spec(s.trim())?;

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                &format!("Size specification '{}' must be positive", s),
            ));
        }

        Ok(Size::new(width, height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRequest {
    pub start: IsoWeek,
    pub weeks_per_page: u32,
    pub pages: u32,
    pub cell_size: Size,
    pub paper_size: Size,
}

impl CalendarRequest {
    pub fn new(
        start: IsoWeek,
        weeks_per_page: u32,
        pages: u32,
        cell_size: Size,
        paper_size: Size,
    ) -> Result<Self> {
        if weeks_per_page == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "weeks per page must be positive",
            ));
        }
        if pages == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "page count must be positive",
            ));
        }

        Ok(CalendarRequest {
            start,
            weeks_per_page,
            pages,
            cell_size,
            paper_size,
        })
    }

    /// First week shown on `page`, counting from zero.
    pub fn first_week_of_page(&self, page: u32) -> Result<IsoWeek> {
        self.start
            .advanced(u64::from(page) * u64::from(self.weeks_per_page))
    }

    /// Days shown on a single page.
    pub fn days_per_page(&self) -> u64 {
        u64::from(self.weeks_per_page) * u64::from(DAYS_PER_WEEK)
    }
}

/// Maps grid coordinates (column 0..=7, row 0..=rows, row 0 at the bottom)
/// to positions on the paper.
///
/// The grid together with the header strip on its left is centered on the
/// paper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: Point,
    cell: Size,
    rows: u32,
}

impl Grid {
    pub fn new(paper: Size, cell: Size, rows: u32, header_width: f64) -> Self {
        let origin = Point::new(
            (paper.width - (cell.width * f64::from(DAYS_PER_WEEK) - header_width)) / 2.0,
            (paper.height - cell.height * f64::from(rows)) / 2.0,
        );

        Grid { origin, cell, rows }
    }

    pub fn raster(&self, x: f64, y: f64) -> Point {
        self.origin + Point::new(self.cell.width * x, self.cell.height * y)
    }

    pub fn lower_left(&self) -> Point {
        self.raster(0.0, 0.0)
    }

    pub fn upper_right(&self) -> Point {
        self.raster(f64::from(DAYS_PER_WEEK), f64::from(self.rows))
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether the grid and a header strip of `header_width` lie on `paper`.
    pub fn fits(&self, paper: Size, header_width: f64) -> bool {
        let (ll, ur) = (self.lower_left(), self.upper_right());
        ll.x - header_width >= 0.0 && ll.y >= 0.0 && ur.x <= paper.width && ur.y <= paper.height
    }
}

/// Label of the day at position `index`, counted over all pages of a run.
///
/// The very first cell of the run and every January 1st carry the full
/// date, other month starts the day and month, all remaining days the day
/// only.
pub fn day_label(index: u64, date: &NaiveDate, names: &MonthNames) -> String {
    if index == 0 || date.ordinal() == 1 {
        format!("{}. {} {}", date.day(), names.name_of(date), date.year())
    } else if date.day() == 1 {
        format!("{}. {}", date.day(), names.name_of(date))
    } else {
        date.day().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    pub week: IsoWeek,
    pub days: Vec<DayCell>,
}

/// `count` weeks starting at `first_monday`, whose cell has the run-wide
/// position `first_index`.
pub fn week_rows(
    first_monday: NaiveDate,
    first_index: u64,
    count: u32,
    names: &MonthNames,
) -> Vec<WeekRow> {
    let total = count as usize * DAYS_PER_WEEK as usize;

    first_monday
        .iter_days()
        .take(total)
        .zip(first_index..)
        .map(|(date, index)| DayCell {
            date,
            label: day_label(index, &date, names),
        })
        .chunks(DAYS_PER_WEEK as usize)
        .into_iter()
        .map(|days| {
            let days: Vec<DayCell> = days.collect();
            WeekRow {
                week: IsoWeek::of(&days[0].date),
                days,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Page {
    pub first_week: IsoWeek,
    pub rows: Vec<WeekRow>,
    pub script: Script,
}

impl Page {
    pub fn file_stem(&self) -> String {
        self.first_week.file_stem()
    }
}

pub fn layout_page(
    request: &CalendarRequest,
    page: u32,
    names: &MonthNames,
    style: &Style,
) -> Result<Page> {
    let first_week = request.first_week_of_page(page)?;
    let first_monday = first_week.monday()?;
    let last_day = first_monday
        .checked_add_days(Days::new(request.days_per_page() - 1))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::DateResolution,
                &format!("page starting at {} runs out of range", first_week),
            )
        })?;
    log::debug!("Page {} covers {} to {}", page, first_monday, last_day);

    let first_index = u64::from(page) * request.days_per_page();
    let rows = week_rows(first_monday, first_index, request.weeks_per_page, names);
    let grid = Grid::new(
        request.paper_size,
        request.cell_size,
        request.weeks_per_page,
        style.header_width,
    );
    if !grid.fits(request.paper_size, style.header_width) {
        log::warn!(
            "Grid of {} weeks does not fit on paper of size {}, output will be clipped",
            request.weeks_per_page,
            request.paper_size
        );
    }
    let row_count = f64::from(grid.rows());
    let columns = f64::from(DAYS_PER_WEEK);

    let mut script = Script::new(style.clone());

    for row in 1..grid.rows() {
        let y = f64::from(row);
        script.line(grid.raster(0.0, y), grid.raster(columns, y));
    }

    for column in 1..DAYS_PER_WEEK {
        let x = f64::from(column);
        script.line(grid.raster(x, 0.0), grid.raster(x, row_count));
    }

    script.rect(grid.lower_left(), grid.upper_right());

    for (i, row) in rows.iter().enumerate() {
        let top = row_count - i as f64;

        script.label(
            row.week.week().to_string(),
            grid.raster(0.0, top - 0.5),
            Align::W,
            FontRole::RowHeader,
        );

        for (j, day) in row.days.iter().enumerate() {
            script.label(
                day.label.clone(),
                grid.raster(j as f64, top),
                Align::SE,
                FontRole::Cell,
            );
        }
    }

    let paper = Point::new(request.paper_size.width, request.paper_size.height);
    script
        .clip(Point::new(0.0, 0.0), paper)
        .fixed_scaling(Point::new(0.0, 0.0), paper);

    Ok(Page {
        first_week,
        rows,
        script,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Command;

    fn request(year: i32, week: u32, weeks_per_page: u32, pages: u32) -> CalendarRequest {
        CalendarRequest::new(
            IsoWeek::new(year, week).unwrap(),
            weeks_per_page,
            pages,
            Size::new(39.0, 18.0),
            Size::new(297.0, 210.0),
        )
        .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_sizes() {
        assert_eq!("39:18".parse::<Size>().unwrap(), Size::new(39.0, 18.0));
        assert_eq!("297.5:210".parse::<Size>().unwrap(), Size::new(297.5, 210.0));
    }

    #[test]
    fn rejects_malformed_sizes() {
        for spec in &["10", "10:20:30", "", ":", "a:b", "10:", "0:10", "-1:5"] {
            let err = spec.parse::<Size>().unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::InvalidArgument),
                "'{}' gave {}",
                spec,
                err
            );
        }
    }

    #[test]
    fn rejects_empty_requests() {
        let start = IsoWeek::new(2024, 1).unwrap();
        let size = Size::new(1.0, 1.0);
        assert!(CalendarRequest::new(start, 0, 1, size, size).is_err());
        assert!(CalendarRequest::new(start, 1, 0, size, size).is_err());
    }

    #[test]
    fn labels() {
        let names = MonthNames::default();
        assert_eq!(day_label(0, &date(2024, 3, 13), &names), "13. März 2024");
        assert_eq!(day_label(5, &date(2025, 1, 1), &names), "1. Januar 2025");
        assert_eq!(day_label(5, &date(2024, 2, 1), &names), "1. Februar");
        assert_eq!(day_label(5, &date(2024, 2, 2), &names), "2");
        assert_eq!(day_label(0, &date(2024, 2, 1), &names), "1. Februar 2024");
    }

    #[test]
    fn single_week_of_2024() {
        let names = MonthNames::default();
        let page = layout_page(&request(2024, 1, 1, 1), 0, &names, &Style::default()).unwrap();

        assert_eq!(page.file_stem(), "2024-W01");
        assert_eq!(page.rows.len(), 1);

        let row = &page.rows[0];
        assert_eq!(row.week, IsoWeek::new(2024, 1).unwrap());
        let dates: Vec<_> = row.days.iter().map(|d| d.date).collect();
        let expected: Vec<_> = (1..=7).map(|d| date(2024, 1, d)).collect();
        assert_eq!(dates, expected);

        let labels: Vec<_> = row.days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["1. Januar 2024", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn month_start_within_page() {
        let names = MonthNames::default();
        let rows = week_rows(date(2024, 1, 29), 0, 2, &names);
        let labels: Vec<_> = rows
            .iter()
            .flat_map(|r| r.days.iter().map(|d| d.label.clone()))
            .collect();
        assert_eq!(labels[0], "29. Januar 2024");
        assert_eq!(labels[3], "1. Februar");
        assert_eq!(labels[4], "2");
        assert_eq!(rows[1].week, IsoWeek::new(2024, 6).unwrap());
    }

    #[test]
    fn pages_advance_by_weeks_per_page() {
        let names = MonthNames::default();
        let req = request(2024, 50, 4, 3);
        let weeks: Vec<_> = (0..req.pages)
            .map(|page| {
                layout_page(&req, page, &names, &Style::default())
                    .unwrap()
                    .first_week
            })
            .collect();

        assert_eq!(
            weeks,
            vec![
                IsoWeek::new(2024, 50).unwrap(),
                IsoWeek::new(2025, 2).unwrap(),
                IsoWeek::new(2025, 6).unwrap(),
            ]
        );

        let first = weeks[0].monday().unwrap();
        for (k, week) in weeks.iter().enumerate() {
            let expected = first + Days::new(k as u64 * 28);
            assert_eq!(week.monday().unwrap(), expected);
        }
    }

    #[test]
    fn only_first_page_names_the_year() {
        let names = MonthNames::default();
        let req = request(2024, 1, 10, 2);
        let second = layout_page(&req, 1, &names, &Style::default()).unwrap();

        let first_cell = &second.rows[0].days[0];
        assert_eq!(first_cell.date, date(2024, 3, 11));
        assert_eq!(first_cell.label, "11");

        let rows = week_rows(date(2024, 3, 11), 70, 1, &names);
        assert_eq!(rows[0].days[0].label, "11");
    }

    #[test]
    fn january_first_on_later_page() {
        let names = MonthNames::default();
        let req = request(2024, 49, 4, 2);
        let second = layout_page(&req, 1, &names, &Style::default()).unwrap();

        let labels: Vec<_> = second.rows[0]
            .days
            .iter()
            .map(|d| d.label.as_str())
            .collect();
        // 2024-W53 does not exist, page 2 starts with 2024-12-30.
        assert_eq!(second.first_week, IsoWeek::new(2025, 1).unwrap());
        assert_eq!(labels, vec!["30", "31", "1. Januar 2025", "2", "3", "4", "5"]);
    }

    #[test]
    fn huge_pages_are_out_of_range() {
        let names = MonthNames::default();
        let req = request(2024, 1, 700_000_000, 1);
        let err = layout_page(&req, 0, &names, &Style::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DateResolution));

        let req = request(2024, 1, u32::MAX, 2);
        assert!(layout_page(&req, 1, &names, &Style::default()).is_err());
    }

    #[test]
    fn grid_is_centered() {
        let paper = Size::new(297.0, 210.0);
        let header_width = 15.0;
        let grid = Grid::new(paper, Size::new(39.0, 18.0), 10, header_width);
        let (ll, ur) = (grid.lower_left(), grid.upper_right());

        let left = ll.x - header_width;
        let right = paper.width - ur.x;
        assert!((left - right).abs() < 1e-9);

        let bottom = ll.y;
        let top = paper.height - ur.y;
        assert!((bottom - top).abs() < 1e-9);

        assert!(grid.fits(paper, header_width));
        assert!(!Grid::new(paper, Size::new(39.0, 18.0), 12, header_width).fits(paper, header_width));
    }

    #[test]
    fn lines_stay_on_paper() {
        let names = MonthNames::default();
        let req = request(2024, 1, 10, 1);
        let page = layout_page(&req, 0, &names, &Style::default()).unwrap();

        let on_paper = |p: &Point| {
            p.x >= 0.0 && p.x <= req.paper_size.width && p.y >= 0.0 && p.y <= req.paper_size.height
        };

        let mut lines = 0;
        let mut rects = 0;
        for cmd in page.script.commands() {
            match cmd {
                Command::Line { from, to } => {
                    lines += 1;
                    assert!(on_paper(from) && on_paper(to));
                }
                Command::Rect {
                    lower_left,
                    upper_right,
                } => {
                    rects += 1;
                    assert!(on_paper(lower_left) && on_paper(upper_right));
                }
                _ => {}
            }
        }

        // 9 interior rows, 6 interior columns
        assert_eq!(lines, 15);
        assert_eq!(rects, 1);
    }

    #[test]
    fn labels_are_placed_per_cell() {
        let names = MonthNames::default();
        let style = Style::default();
        let req = request(2024, 1, 2, 1);
        let page = layout_page(&req, 0, &names, &style).unwrap();
        let grid = Grid::new(req.paper_size, req.cell_size, 2, style.header_width);

        let headers: Vec<_> = page
            .script
            .labels()
            .filter(|(_, _, font)| *font == FontRole::RowHeader)
            .map(|(text, at, _)| (text.to_owned(), *at))
            .collect();
        assert_eq!(
            headers,
            vec![
                ("1".to_owned(), grid.raster(0.0, 1.5)),
                ("2".to_owned(), grid.raster(0.0, 0.5)),
            ]
        );

        let cells: Vec<_> = page
            .script
            .labels()
            .filter(|(_, _, font)| *font == FontRole::Cell)
            .collect();
        assert_eq!(cells.len(), 14);
        assert_eq!(cells[0].0, "1. Januar 2024");
        assert_eq!(*cells[0].1, grid.raster(0.0, 2.0));
        assert_eq!(cells[13].0, "14");
        assert_eq!(*cells[13].1, grid.raster(6.0, 1.0));
    }

    #[test]
    fn ends_with_clip_and_scaling() {
        let names = MonthNames::default();
        let page = layout_page(&request(2024, 1, 1, 1), 0, &names, &Style::default()).unwrap();
        let tail = &page.script.commands()[page.script.commands().len() - 2..];
        let paper = Point::new(297.0, 210.0);
        assert_eq!(
            tail,
            &[
                Command::Clip {
                    lower_left: Point::new(0.0, 0.0),
                    upper_right: paper,
                },
                Command::FixedScaling {
                    lower_left: Point::new(0.0, 0.0),
                    upper_right: paper,
                },
            ]
        );
    }
}
