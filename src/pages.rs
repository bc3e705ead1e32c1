use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use crate::asy::AsySource;
use crate::config::Style;
use crate::error::{Error, Result};
use crate::interrupt;
use crate::layout::{layout_page, CalendarRequest, Page};
use crate::locale::MonthNames;
use crate::render::Renderer;

/// Renders `page` into `out_dir`.
///
/// The script is compiled inside a temporary directory below `out_dir`,
/// which is removed on every path. The PDF is moved to its final name only
/// after the renderer succeeded and no interrupt was seen.
pub fn render_page(
    page: &Page,
    renderer: &dyn Renderer,
    out_dir: &Path,
    interrupted: &AtomicBool,
) -> Result<PathBuf> {
    let stem = page.file_stem();
    let workdir = tempfile::Builder::new()
        .prefix(".kalenderblatt-")
        .tempdir_in(out_dir)
        .map_err(|err| {
            Error::from(err).with_msg(&format!(
                "Could not create a work directory in '{}'",
                out_dir.display()
            ))
        })?;

    let script_path = workdir.path().join(format!("{}.asy", stem));
    fs::write(&script_path, AsySource(&page.script).to_string())?;
    log::debug!("Wrote script '{}'", script_path.display());

    interrupt::check(interrupted)?;
    let rendered = renderer.render(&script_path)?;
    interrupt::check(interrupted)?;

    let target = out_dir.join(format!("{}.pdf", stem));
    fs::rename(&rendered, &target)?;

    Ok(target)
}

/// Lays out and renders every page of `request`, one after another.
pub fn generate(
    request: &CalendarRequest,
    names: &MonthNames,
    style: &Style,
    renderer: &dyn Renderer,
    out_dir: &Path,
    interrupted: &AtomicBool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(request.pages as usize);

    for page_num in 0..request.pages {
        interrupt::check(interrupted)?;

        let page = layout_page(request, page_num, names, style)?;
        log::info!(
            "Page {}/{} starts with week {}",
            page_num + 1,
            request.pages,
            page.first_week
        );

        let path = render_page(&page, renderer, out_dir, interrupted)?;
        log::info!("Wrote '{}'", path.display());
        written.push(path);
    }

    interrupt::check(interrupted)?;

    Ok(written)
}
