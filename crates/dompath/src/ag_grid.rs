//! AG-Grid navigation and verification.
//!
//! AG-Grid virtualizes both axes: only the rows and columns inside the
//! viewport exist in the DOM. Rows are identified by their `row-index`
//! attribute and cells by the `col-id` of their column, which is discovered
//! once from the header row and cached.
//!
//! ```no_run
//! use dompath::ag_grid::AgGrid;
//! use dompath::browser::MockBrowser;
//!
//! # fn main() -> dompath::DomPathResult<()> {
//! let browser = MockBrowser::new();
//! let mut grid = AgGrid::builder()
//!     .with_headers(["Make", "Model"])
//!     .with_rows_as_strings([[("Make", "Toyota"), ("Model", "Celica")]])
//!     .is_strict()
//!     .build()?;
//! grid.find_table_in_browser(&browser)?;
//! # Ok(())
//! # }
//! ```
//!
//! Every public operation that scrolls lowers the implicit timeout so each
//! probe fails fast, and restores the final timeout on every exit path.

use crate::browser::{Browser, BrowserExt, ElementRef, TimeoutGuard};
use crate::config::{GridConfig, GridTimeouts};
use crate::path::property::{
    contains, has_aggregated_text_equal_to, has_any_of_classes, has_attribute_value, has_class,
    has_ref, has_role,
};
use crate::path::{ElementProperty, Path};
use crate::paths::{DIV, HTML, SPAN};
use crate::result::{DomPathError, DomPathResult};
use crate::scroll::ScrollElement;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, trace};

/// Attribute holding the logical column id of headers and cells
pub const COL_ID: &str = "col-id";

/// Attribute holding the logical index of a row
pub const ROW_INDEX: &str = "row-index";

/// Expected content of one row: column title to cell property
pub type RowSpec = BTreeMap<String, ElementProperty>;

/// A header cell
#[must_use]
pub fn header_cell() -> Path {
    DIV.that([has_class("ag-header-cell")])
}

/// The text span of a header cell
#[must_use]
pub fn header_text() -> Path {
    SPAN.that([has_ref("eText")])
}

/// A row
#[must_use]
pub fn row() -> Path {
    DIV.that([has_role("row")])
}

/// A cell
#[must_use]
pub fn cell() -> Path {
    DIV.that([has_role("gridcell")])
}

fn has_column_id(id: &str) -> ElementProperty {
    has_attribute_value(COL_ID, id)
}

fn has_row_index(index: usize) -> ElementProperty {
    has_attribute_value(ROW_INDEX, index.to_string())
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for [`AgGrid`]
#[derive(Debug, Clone)]
pub struct AgGridBuilder {
    headers: Option<Vec<String>>,
    rows: Option<Vec<RowSpec>>,
    virtualized: bool,
    strict: bool,
    container: Path,
    config: GridConfig,
}

impl Default for AgGridBuilder {
    fn default() -> Self {
        Self {
            headers: None,
            rows: None,
            virtualized: true,
            strict: false,
            container: HTML,
            config: GridConfig::default(),
        }
    }
}

impl AgGridBuilder {
    /// Column titles, in display order
    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Expected rows as column title to exact aggregated cell text
    #[must_use]
    pub fn with_rows_as_strings<I, R, K, V>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rows = Some(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(k, v)| (k.into(), has_aggregated_text_equal_to(v)))
                        .collect()
                })
                .collect(),
        );
        self
    }

    /// Expected rows as column title to cell property
    #[must_use]
    pub fn with_rows_as_element_properties<I, R, K>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, ElementProperty)>,
        K: Into<String>,
    {
        self.rows = Some(
            rows.into_iter()
                .map(|row| row.into_iter().map(|(k, v)| (k.into(), v)).collect())
                .collect(),
        );
        self
    }

    /// The whole grid is rendered; no scrolling needed
    #[must_use]
    pub const fn without_virtualization(mut self) -> Self {
        self.virtualized = false;
        self
    }

    /// Look for the grid inside a container instead of the whole page
    #[must_use]
    pub fn contained_in(mut self, container: &Path) -> Self {
        self.container = container.clone();
        self
    }

    /// Fail verification when the grid has more rows than expected
    #[must_use]
    pub const fn is_strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Timeouts and search limit
    #[must_use]
    pub const fn with_config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Highest row index probed by [`AgGrid::find_row_index`]
    #[must_use]
    pub const fn with_row_search_limit(mut self, limit: usize) -> Self {
        self.config.row_search_limit = limit;
        self
    }

    /// Build the grid description
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when headers or rows were not given.
    pub fn build(self) -> DomPathResult<AgGrid> {
        let Some(headers) = self.headers else {
            return Err(DomPathError::invalid_argument("AgGrid requires headers"));
        };
        let Some(rows) = self.rows else {
            return Err(DomPathError::invalid_argument("AgGrid requires rows"));
        };
        Ok(AgGrid {
            headers,
            rows,
            virtualized: self.virtualized,
            strict: self.strict,
            paths: GridPaths::new(&self.container),
            config: self.config,
            state: GridState::default(),
        })
    }
}

// =============================================================================
// GRID
// =============================================================================

/// Structural paths of one grid instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPaths {
    /// Header containers (pinned left, pinned right, scrolling)
    pub header_wrapper: Path,
    /// Row container
    pub table_content: Path,
    /// Vertically scrolling viewport
    pub table_viewport: Path,
    /// Horizontally scrolling viewport of newer grid versions
    pub center_viewport: Path,
}

impl GridPaths {
    fn new(container: &Path) -> Self {
        Self {
            header_wrapper: DIV
                .that([has_any_of_classes([
                    "ag-pinned-right-header",
                    "ag-pinned-left-header",
                    "ag-header-viewport",
                ])])
                .inside(container),
            table_content: DIV
                .that([has_any_of_classes(["ag-body-viewport", "ag-body"])])
                .inside(container),
            table_viewport: DIV.with_class("ag-body-viewport").inside(container),
            center_viewport: DIV.with_class("ag-center-cols-viewport").inside(container),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GridState {
    column_ids: HashMap<String, String>,
    horizontal_scroll: Option<Path>,
}

/// Expected AG-Grid content and the operations to find it in a page
#[derive(Debug, Clone)]
pub struct AgGrid {
    headers: Vec<String>,
    rows: Vec<RowSpec>,
    virtualized: bool,
    strict: bool,
    paths: GridPaths,
    config: GridConfig,
    state: GridState,
}

impl fmt::Display for AgGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AgGrid{{headers={:?}, rows={}}}",
            self.headers,
            self.rows.len()
        )
    }
}

impl AgGrid {
    /// Start building a grid
    #[must_use]
    pub fn builder() -> AgGridBuilder {
        AgGridBuilder::default()
    }

    /// Column titles
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Expected rows
    #[must_use]
    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    /// Whether the grid is virtualized
    #[must_use]
    pub const fn is_virtualized(&self) -> bool {
        self.virtualized
    }

    /// Structural paths
    #[must_use]
    pub const fn paths(&self) -> &GridPaths {
        &self.paths
    }

    /// Current timeouts
    #[must_use]
    pub const fn timeouts(&self) -> GridTimeouts {
        self.config.timeouts
    }

    /// Column ids discovered so far
    #[must_use]
    pub fn column_ids(&self) -> &HashMap<String, String> {
        &self.state.column_ids
    }

    /// Implicit timeout while scrolling
    pub fn override_timeout_during_operation(&mut self, millis: u64) {
        self.config.timeouts.operation_timeout_ms = millis;
    }

    /// Implicit timeout restored after each operation
    pub fn override_timeout_when_done(&mut self, millis: u64) {
        self.config.timeouts.final_timeout_ms = millis;
    }

    // -------------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------------

    /// Header cell whose text is `title`
    #[must_use]
    pub fn header_path(&self, title: &str) -> Path {
        header_cell()
            .inside(&self.paths.header_wrapper)
            .containing(&header_text().that([has_aggregated_text_equal_to(title)]))
            .described_by(format!("header '{title}'"))
    }

    /// Row with the given `row-index`
    #[must_use]
    pub fn row_path(&self, index: usize) -> Path {
        row()
            .that([has_row_index(index)])
            .inside(&self.paths.table_content)
            .described_by(format!("row with index {index}"))
    }

    /// Cell of column `column_id` inside `row`
    #[must_use]
    pub fn cell_path(&self, row: &Path, column_id: &str) -> Path {
        cell()
            .inside(row)
            .described_by(format!("cell in {row}"))
            .that([has_column_id(column_id)])
    }

    /// Row, optionally at `index`, holding every cell of `spec`, as a single path.
    ///
    /// Needs the column ids, see [`AgGrid::find_column_mapping`].
    pub fn expected_row_path(&self, index: Option<usize>, spec: &RowSpec) -> DomPathResult<Path> {
        let base = match index {
            Some(i) => self.row_path(i),
            None => row().inside(&self.paths.table_content).described_by("row"),
        };
        spec.iter().try_fold(base, |acc, (title, expected)| {
            let id = self.column_id(title)?;
            let cell = cell().that([has_column_id(id), expected.clone()]);
            Ok(acc.that([contains(&cell)]))
        })
    }

    fn column_id(&self, title: &str) -> DomPathResult<&str> {
        self.state
            .column_ids
            .get(title)
            .map(String::as_str)
            .ok_or_else(|| DomPathError::invalid_argument(format!("unknown column '{title}'")))
    }

    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Verify every expected row is in the grid, and in strict mode that
    /// there are no others.
    pub fn find_table_in_browser<B: Browser + ?Sized>(&mut self, browser: &B) -> DomPathResult<()> {
        browser.find(&header_cell().inside(&self.paths.header_wrapper))?;
        let _guard = if self.virtualized {
            Some(self.lower_timeout(browser)?)
        } else {
            None
        };

        self.discover_columns(browser)?;
        for index in 0..self.rows.len() {
            if self.virtualized {
                let spec = self.rows[index].clone();
                self.find_row(browser, index, &spec)?;
            } else {
                browser.find(&self.expected_row_path(Some(index), &self.rows[index])?)?;
            }
            debug!(index, "expected row found");
        }

        if self.strict {
            self.verify_no_row_with_index(browser, self.rows.len())?;
        }
        Ok(())
    }

    /// Discover and cache the `col-id` of every header
    pub fn find_column_mapping<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
    ) -> DomPathResult<&HashMap<String, String>> {
        {
            let _guard = self.lower_timeout(browser)?;
            self.discover_columns(browser)?;
        }
        Ok(&self.state.column_ids)
    }

    /// Scroll until the row with `index` is visible and return its path
    pub fn ensure_visibility_of_row_with_index<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        index: usize,
    ) -> DomPathResult<Path> {
        let _guard = self.lower_timeout(browser)?;
        self.ensure_row_visible(browser, index)
    }

    /// Scroll until the cell at `index` in column `column_title` is visible
    /// and return its path
    pub fn ensure_visibility_of_row_with_index_and_column<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        index: usize,
        column_title: &str,
    ) -> DomPathResult<Path> {
        let _guard = self.lower_timeout(browser)?;
        if self.state.column_ids.is_empty() {
            self.discover_columns(browser)?;
        }
        let nth_row = self.ensure_row_visible(browser, index)?;
        let id = self.column_id(column_title)?.to_string();
        let cell = self.cell_path(&nth_row, &id);

        let horizontal = self.horizontal_scroller(browser)?;
        let rightmost = self.right_of_table(browser)?;
        horizontal.to_left_corner()?;
        horizontal.right_until_predicate(&cell, |el| column_visible(browser, el, rightmost))?;
        Ok(cell)
    }

    /// Index of the first row whose cells match `spec`.
    ///
    /// Probes indices from zero up to the configured search limit. A row
    /// whose content does not match is skipped; running past the last row
    /// yields `IndexOutOfBounds`.
    pub fn find_row_index<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        spec: &RowSpec,
    ) -> DomPathResult<usize> {
        if !self.virtualized {
            if self.state.column_ids.is_empty() {
                self.discover_columns(browser)?;
            }
            let found = browser.find(&self.expected_row_path(None, spec)?)?;
            return parse_row_index(browser, &found);
        }

        let _guard = self.lower_timeout(browser)?;
        if self.state.column_ids.is_empty() {
            self.discover_columns(browser)?;
        }
        for index in 0..self.config.row_search_limit {
            match self.find_row(browser, index, spec) {
                Ok(_) => return Ok(index),
                Err(e) if e.is_not_found() => trace!(index, "row content does not match"),
                Err(e) => return Err(e),
            }
        }
        Err(DomPathError::not_found(format!(
            "no row within the first {} matches",
            self.config.row_search_limit
        )))
    }

    /// Scroll the header `title` into view and return its path
    pub fn get_visible_header_path<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        title: &str,
    ) -> DomPathResult<Path> {
        let _guard = self.lower_timeout(browser)?;
        let viewport = self.viewport_scroller(browser)?;
        let horizontal = self.horizontal_scroller(browser)?;
        viewport.to_top_left_corner()?;
        horizontal.to_left_corner()?;

        let header = self.header_path(title);
        let rightmost = self.right_of_table(browser)?;
        viewport.right_until_predicate(&header, |el| column_visible(browser, el, rightmost))?;
        Ok(header)
    }

    /// Open the column menu of a header
    pub fn click_menu_of_header<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        title: &str,
    ) -> DomPathResult<()> {
        let header = self.get_visible_header_path(browser, title)?;
        browser.click_on(&SPAN.that([has_ref("eMenu")]).inside(&header))?;
        Ok(())
    }

    /// Click a header's label to sort by it
    pub fn click_on_sort<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        title: &str,
    ) -> DomPathResult<()> {
        let header = self.get_visible_header_path(browser, title)?;
        browser.click_on(&DIV.that([has_ref("eLabel")]).inside(&header))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals: never touch the implicit timeout
    // -------------------------------------------------------------------------

    fn lower_timeout<'b, B: Browser + ?Sized>(
        &self,
        browser: &'b B,
    ) -> DomPathResult<TimeoutGuard<'b, B>> {
        let timeouts = self.config.timeouts;
        TimeoutGuard::set(browser, timeouts.operation_timeout(), timeouts.final_timeout())
    }

    // Newer grid versions scroll columns in a dedicated viewport.
    fn horizontal_scroll<B: Browser + ?Sized>(&mut self, browser: &B) -> DomPathResult<Path> {
        if let Some(path) = &self.state.horizontal_scroll {
            return Ok(path.clone());
        }
        let path = if browser.is_present(&self.paths.center_viewport)? {
            self.paths.center_viewport.clone()
        } else {
            debug!("no center viewport, scrolling columns in the body viewport");
            self.paths.table_viewport.clone()
        };
        self.state.horizontal_scroll = Some(path.clone());
        Ok(path)
    }

    fn viewport_scroller<'b, B: Browser + ?Sized>(
        &self,
        browser: &'b B,
    ) -> DomPathResult<ScrollElement<'b, B>> {
        let scroll = ScrollElement::new(browser, &self.paths.table_viewport)?;
        Ok(scroll.with_config(self.config.scroll))
    }

    fn horizontal_scroller<'b, B: Browser + ?Sized>(
        &mut self,
        browser: &'b B,
    ) -> DomPathResult<ScrollElement<'b, B>> {
        let container = self.horizontal_scroll(browser)?;
        Ok(ScrollElement::new(browser, &container)?.with_config(self.config.scroll))
    }

    fn discover_columns<B: Browser + ?Sized>(&mut self, browser: &B) -> DomPathResult<()> {
        let horizontal = if self.virtualized {
            Some(self.horizontal_scroller(browser)?)
        } else {
            None
        };

        for title in self.headers.clone() {
            let header = self.header_path(&title);
            let header_cell = match &horizontal {
                Some(scroll) => scroll.right_until_element_is_present(&header)?,
                None => browser.find(&header)?,
            };
            let id = browser.attribute(&header_cell, COL_ID)?.ok_or_else(|| {
                DomPathError::UnsupportedOperation {
                    message: format!("could not find column id for {header}"),
                }
            })?;
            debug!(title = %title, id = %id, "column discovered");
            self.state.column_ids.insert(title, id);
            if let Some(scroll) = &horizontal {
                scroll.to_top_left_corner()?;
            }
        }
        Ok(())
    }

    fn bottom_of_table<B: Browser + ?Sized>(&self, browser: &B) -> DomPathResult<i64> {
        let content = browser.find(&self.paths.table_content)?;
        Ok(browser.rect(&content)?.bottom())
    }

    fn right_of_table<B: Browser + ?Sized>(&self, browser: &B) -> DomPathResult<i64> {
        let content = browser.find(&self.paths.table_content)?;
        Ok(browser.rect(&content)?.right())
    }

    fn visible_row<B: Browser + ?Sized>(
        browser: &B,
        row: &Path,
        bottom: i64,
    ) -> DomPathResult<Option<ElementRef>> {
        let candidates = match browser.find_all(row) {
            Ok(candidates) => candidates,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        for candidate in candidates {
            if row_visible(browser, &candidate, bottom)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn ensure_row_visible<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        index: usize,
    ) -> DomPathResult<Path> {
        let nth_row = self.row_path(index);
        let bottom = self.bottom_of_table(browser)?;
        if Self::visible_row(browser, &nth_row, bottom)?.is_some() {
            trace!(index, "row already visible");
            return Ok(nth_row);
        }

        let viewport = self.viewport_scroller(browser)?;
        let horizontal = self.horizontal_scroller(browser)?;
        viewport.to_top_left_corner()?;
        horizontal.to_left_corner()?;
        viewport.down_until_predicate(&nth_row, |el| row_visible(browser, el, bottom))?;
        Ok(nth_row)
    }

    fn find_row<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        index: usize,
        spec: &RowSpec,
    ) -> DomPathResult<Path> {
        let viewport = self.viewport_scroller(browser)?;
        let horizontal = self.horizontal_scroller(browser)?;
        viewport.to_top_left_corner()?;
        horizontal.to_left_corner()?;

        let my_row = self.row_path(index);
        viewport
            .down_until_element_is_present(&my_row)
            .map_err(|e| match e {
                DomPathError::NotFound { message } => DomPathError::IndexOutOfBounds {
                    message: format!("row {index} was not found: {message}"),
                },
                other => other,
            })?;

        for (title, expected) in spec {
            let id = self.column_id(title)?;
            let expected_cell = self.cell_path(&my_row, id).and(expected.clone());
            horizontal.right_until_element_is_present(&expected_cell)?;
            horizontal.to_left_corner()?;
        }

        let bottom = self.bottom_of_table(browser)?;
        viewport.down_until_predicate(&my_row, |el| row_visible(browser, el, bottom))?;
        Ok(my_row)
    }

    fn verify_no_row_with_index<B: Browser + ?Sized>(
        &mut self,
        browser: &B,
        index: usize,
    ) -> DomPathResult<()> {
        let extra_row = self.row_path(index);
        let found = if self.virtualized {
            self.viewport_scroller(browser)?
                .down_until_element_is_present(&extra_row)
        } else {
            browser.find(&extra_row)
        };
        match found {
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
            Ok(_) => Err(DomPathError::not_found(format!(
                "grid with exactly {index} rows. Found too many rows."
            ))),
        }
    }
}

fn row_visible<B: Browser + ?Sized>(
    browser: &B,
    element: &ElementRef,
    bottom_of_table: i64,
) -> DomPathResult<bool> {
    Ok(browser.is_displayed(element)? && browser.rect(element)?.y < bottom_of_table)
}

fn column_visible<B: Browser + ?Sized>(
    browser: &B,
    element: &ElementRef,
    right_of_table: i64,
) -> DomPathResult<bool> {
    Ok(browser.is_displayed(element)? && browser.rect(element)?.x < right_of_table)
}

fn parse_row_index<B: Browser + ?Sized>(browser: &B, row: &ElementRef) -> DomPathResult<usize> {
    let value = browser
        .attribute(row, ROW_INDEX)?
        .ok_or_else(|| DomPathError::UnsupportedOperation {
            message: format!("row {row} has no {ROW_INDEX} attribute"),
        })?;
    value.trim().parse().map_err(|_| DomPathError::Driver {
        message: format!("row {row} has a non-numeric {ROW_INDEX}: {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MockBrowser, MockElement};
    use crate::paths::FORM;

    fn grid() -> AgGrid {
        AgGrid::builder()
            .with_headers(["A", "B"])
            .with_rows_as_strings([[("A", "1"), ("B", "2")]])
            .build()
            .unwrap()
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_missing_headers_or_rows() {
            let err = AgGrid::builder()
                .with_rows_as_strings(Vec::<Vec<(&str, &str)>>::new())
                .build()
                .unwrap_err();
            assert!(matches!(err, DomPathError::InvalidArgument { .. }));
            assert!(AgGrid::builder().with_headers(["A"]).build().is_err());
        }

        #[test]
        fn test_defaults() {
            let grid = grid();
            assert!(grid.is_virtualized());
            assert_eq!(grid.timeouts(), GridTimeouts::default());
            assert_eq!(grid.rows()[0]["A"], has_aggregated_text_equal_to("1"));
            assert_eq!(grid.to_string(), "AgGrid{headers=[\"A\", \"B\"], rows=1}");
        }

        #[test]
        fn test_timeout_overrides() {
            let mut grid = grid();
            grid.override_timeout_during_operation(20);
            grid.override_timeout_when_done(1000);
            assert_eq!(grid.timeouts().operation_timeout_ms, 20);
            assert_eq!(grid.timeouts().final_timeout_ms, 1000);
        }

        #[test]
        fn test_container_scopes_paths() {
            let grid = AgGrid::builder()
                .with_headers(["A"])
                .with_rows_as_element_properties([[("A", has_class("x"))]])
                .contained_in(&FORM)
                .without_virtualization()
                .build()
                .unwrap();
            assert!(grid.paths().table_viewport.to_xpath().starts_with("//form//div"));
            assert!(!grid.is_virtualized());
        }
    }

    mod path_tests {
        use super::*;

        #[test]
        fn test_descriptions() {
            let grid = grid();
            assert_eq!(grid.header_path("A").describe(), "header 'A'");
            assert_eq!(grid.row_path(3).describe(), "row with index 3");
            assert_eq!(
                grid.cell_path(&grid.row_path(3), "a").describe(),
                "cell in row with index 3, that has col-id: \"a\""
            );
        }

        #[test]
        fn test_header_xpath() {
            let grid = grid();
            let xpath = grid.header_path("A").to_xpath();
            assert!(xpath.starts_with("//html//div[(contains"));
            assert!(xpath.ends_with(
                ".//span[@ref='eText' and normalize-space(string(.))='A']]"
            ));
        }

        #[test]
        fn test_expected_row_path_needs_columns() {
            let grid = grid();
            let err = grid.expected_row_path(Some(0), &grid.rows()[0]).unwrap_err();
            assert!(matches!(err, DomPathError::InvalidArgument { .. }));
        }
    }

    mod static_grid_tests {
        use super::*;
        use std::time::Duration;

        fn static_grid(strict: bool) -> AgGrid {
            let builder = AgGrid::builder()
                .with_headers(["A", "B"])
                .with_rows_as_strings([[("A", "1"), ("B", "2")], [("A", "3"), ("B", "4")]])
                .without_virtualization();
            let builder = if strict { builder.is_strict() } else { builder };
            builder.build().unwrap()
        }

        fn page(grid: &mut AgGrid) -> MockBrowser {
            let browser = MockBrowser::new();
            let any_header = browser.add_element(MockElement::new("div"));
            browser.register(&header_cell().inside(&grid.paths().header_wrapper), &[any_header]);
            for (title, id) in [("A", "a"), ("B", "b")] {
                let header = browser.add_element(MockElement::new("div").with_attribute(COL_ID, id));
                browser.register(&grid.header_path(title), &[header]);
            }
            grid.find_column_mapping(&browser).unwrap();
            for index in 0..2 {
                let row = browser.add_element(
                    MockElement::new("div").with_attribute(ROW_INDEX, index.to_string()),
                );
                let spec = grid.rows()[index].clone();
                browser.register(&grid.expected_row_path(Some(index), &spec).unwrap(), &[row.clone()]);
                browser.register(&grid.expected_row_path(None, &spec).unwrap(), &[row.clone()]);
                browser.register(&grid.row_path(index), &[row]);
            }
            browser
        }

        #[test]
        fn test_column_mapping() {
            let mut grid = static_grid(false);
            let browser = page(&mut grid);
            assert_eq!(grid.column_ids()["A"], "a");
            assert_eq!(grid.column_ids()["B"], "b");
            assert_eq!(browser.implicit_timeout(), Duration::from_millis(5000));
        }

        #[test]
        fn test_missing_col_id_is_unsupported() {
            let browser = MockBrowser::new();
            let mut grid = static_grid(false);
            let header = browser.add_element(MockElement::new("div"));
            browser.register(&grid.header_path("A"), &[header]);
            let err = grid.find_column_mapping(&browser).unwrap_err();
            assert!(matches!(err, DomPathError::UnsupportedOperation { .. }));
        }

        #[test]
        fn test_find_table() {
            let mut grid = static_grid(true);
            let browser = page(&mut grid);
            grid.find_table_in_browser(&browser).unwrap();
            assert!(!browser.was_called("scroll_by"));
        }

        #[test]
        fn test_strict_rejects_extra_row() {
            let mut grid = static_grid(true);
            let browser = page(&mut grid);
            let extra = browser.add_element(MockElement::new("div"));
            browser.register(&grid.row_path(2), &[extra]);
            let err = grid.find_table_in_browser(&browser).unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("grid with exactly 2 rows. Found too many rows."));
        }

        #[test]
        fn test_find_row_index_reads_attribute() {
            let mut grid = static_grid(false);
            let browser = page(&mut grid);
            let spec = grid.rows()[1].clone();
            assert_eq!(grid.find_row_index(&browser, &spec).unwrap(), 1);
        }

        #[test]
        fn test_unknown_column_in_row() {
            let mut grid = static_grid(false);
            let _browser = page(&mut grid);
            let spec: RowSpec = [("C".to_string(), has_class("x"))].into_iter().collect();
            let err = grid.expected_row_path(None, &spec).unwrap_err();
            assert!(matches!(err, DomPathError::InvalidArgument { .. }));
        }
    }

    mod visibility_tests {
        use super::*;
        use crate::browser::{Rect, ScrollWindow};

        #[test]
        fn test_row_scrolled_into_view() {
            let browser = MockBrowser::new();
            let mut grid = grid();
            let viewport = browser.add_element(MockElement::new("div").scrollable(0, 2000));
            let content = browser.add_element(MockElement::new("div").with_rect(Rect::new(0, 0, 500, 300)));
            browser.register(&grid.paths().table_viewport, &[viewport.clone()]);
            browser.register(&grid.paths().table_content, &[content]);
            let row = browser.add_element(
                MockElement::new("div")
                    .with_rect(Rect::new(0, 900, 500, 20))
                    .anchored_to(&viewport),
            );
            browser.register_when(&grid.row_path(40), &[row], ScrollWindow::vertical(&viewport, 600..=2000));

            let path = grid.ensure_visibility_of_row_with_index(&browser, 40).unwrap();
            assert_eq!(path, grid.row_path(40));
            // 900 - 750 < 300
            assert_eq!(browser.scroll_offset(&viewport).unwrap().y, 750);
            assert_eq!(
                browser.calls_to("set_implicit_timeout"),
                vec!["set_implicit_timeout:5", "set_implicit_timeout:5000"]
            );
        }

        #[test]
        fn test_visible_row_needs_no_scrolling() {
            let browser = MockBrowser::new();
            let mut grid = grid();
            let content = browser.add_element(MockElement::new("div").with_rect(Rect::new(0, 0, 500, 300)));
            browser.register(&grid.paths().table_content, &[content]);
            let row = browser.add_element(MockElement::new("div").with_rect(Rect::new(0, 40, 500, 20)));
            browser.register(&grid.row_path(1), &[row]);

            grid.ensure_visibility_of_row_with_index(&browser, 1).unwrap();
            assert!(!browser.was_called("scroll_to"));
        }
    }

    mod header_tests {
        use super::*;
        use crate::browser::Rect;
        use crate::config::ScrollConfig;

        struct HeaderPage {
            browser: MockBrowser,
            viewport: ElementRef,
        }

        // Header "B" sits at x=700 in a 500px wide table.
        fn header_page(grid: &AgGrid) -> HeaderPage {
            let browser = MockBrowser::new();
            let viewport = browser.add_element(MockElement::new("div").scrollable(1000, 0));
            let content =
                browser.add_element(MockElement::new("div").with_rect(Rect::new(0, 0, 500, 300)));
            browser.register(&grid.paths().table_viewport, &[viewport.clone()]);
            browser.register(&grid.paths().table_content, &[content]);
            let header = browser.add_element(
                MockElement::new("div")
                    .with_rect(Rect::new(700, 0, 100, 30))
                    .anchored_to(&viewport),
            );
            browser.register(&grid.header_path("B"), &[header]);
            HeaderPage { browser, viewport }
        }

        #[test]
        fn test_header_scrolled_into_view() {
            let mut grid = grid();
            let page = header_page(&grid);

            let header = grid.get_visible_header_path(&page.browser, "B").unwrap();
            assert_eq!(header, grid.header_path("B"));
            // 700 - 300 < 500
            assert_eq!(page.browser.scroll_offset(&page.viewport).unwrap().x, 300);
            assert_eq!(page.browser.calls_to("scroll_by").len(), 2);
            assert_eq!(
                page.browser.calls_to("set_implicit_timeout"),
                vec!["set_implicit_timeout:5", "set_implicit_timeout:5000"]
            );
        }

        #[test]
        fn test_missing_header_restores_timeout() {
            let mut grid = grid();
            let page = header_page(&grid);
            grid.override_timeout_when_done(2000);

            let err = grid.get_visible_header_path(&page.browser, "A").unwrap_err();
            assert!(err.is_not_found());
            assert_eq!(page.browser.implicit_timeout(), std::time::Duration::from_millis(2000));
        }

        #[test]
        fn test_click_menu_of_header() {
            let mut grid = grid();
            let page = header_page(&grid);
            let menu = page.browser.add_element(MockElement::new("span"));
            let menu_path = SPAN.that([has_ref("eMenu")]).inside(&grid.header_path("B"));
            page.browser.register(&menu_path, &[menu.clone()]);

            grid.click_menu_of_header(&page.browser, "B").unwrap();
            assert_eq!(page.browser.calls_to("click"), vec![format!("click:{menu}")]);
            assert_eq!(
                page.browser.calls_to("set_implicit_timeout").last().unwrap(),
                "set_implicit_timeout:5000"
            );
        }

        #[test]
        fn test_click_on_sort() {
            let mut grid = grid();
            let page = header_page(&grid);
            let label = page.browser.add_element(MockElement::new("div"));
            let label_path = DIV.that([has_ref("eLabel")]).inside(&grid.header_path("B"));
            page.browser.register(&label_path, &[label.clone()]);

            grid.click_on_sort(&page.browser, "B").unwrap();
            assert_eq!(page.browser.calls_to("click"), vec![format!("click:{label}")]);
        }

        #[test]
        fn test_grid_scroll_config() {
            let config = GridConfig {
                scroll: ScrollConfig::default().with_step(300),
                ..GridConfig::default()
            };
            let mut grid = AgGrid::builder()
                .with_headers(["A", "B"])
                .with_rows_as_strings([[("A", "1"), ("B", "2")]])
                .with_config(config)
                .build()
                .unwrap();
            let page = header_page(&grid);

            grid.get_visible_header_path(&page.browser, "B").unwrap();
            assert_eq!(
                page.browser.calls_to("scroll_by"),
                vec![format!("scroll_by:{}:300,0", page.viewport)]
            );
        }
    }
}
