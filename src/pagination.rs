//! # Pagination Walker
//!
//! List endpoints return one page per request and point at the following page
//! through a `Link: <url>; rel="next"` header. The walker either fetches a
//! single page, buffers every page into one JSON array, or streams each page's
//! rows to the output as soon as it arrives.
//!
//! Once the walk has moved past the first page the cursor URL replaces both
//! path and query; the original query parameters are not sent again.
//!
//! In streaming mode rows already written stay written when a later page
//! fails. Buffered JSON output is all-or-nothing.

use crate::error::{CliError, Result};
use crate::http::{Executor, Query, Request, Response};
use crate::output::{self, ColumnWidths, OutputMode};
use crate::resources::ResourceView;
use serde_json::Value;
use std::collections::HashSet;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Collect every page, then print one JSON array
    BufferedJson,
    /// Print each page's rows as soon as it is fetched
    RowStreamed,
}

impl PageMode {
    pub fn for_output(mode: &OutputMode) -> Self {
        if mode.json {
            PageMode::BufferedJson
        } else {
            PageMode::RowStreamed
        }
    }
}

/// Iterator over the pages of a listing, following `next` cursors
pub struct Pages<'a, E: Executor + ?Sized> {
    executor: &'a E,
    next: Option<Request>,
    seen: HashSet<String>,
    pending_error: Option<CliError>,
}

impl<'a, E: Executor + ?Sized> Pages<'a, E> {
    pub fn new(executor: &'a E, first: Request) -> Self {
        Self {
            executor,
            next: Some(first),
            seen: HashSet::new(),
            pending_error: None,
        }
    }
}

impl<E: Executor + ?Sized> Iterator for Pages<'_, E> {
    type Item = Result<Response>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_error.take() {
            return Some(Err(err));
        }
        let request = self.next.take()?;

        let response = match self.executor.execute(request) {
            Ok(response) => response,
            Err(err) => return Some(Err(err)),
        };

        if let Some(cursor) = response.next_link() {
            if self.seen.insert(cursor.clone()) {
                tracing::debug!("Following next page cursor {cursor}");
                self.next = Some(Request::get(cursor));
            } else {
                tracing::warn!("Next page cursor {cursor} was already fetched");
                self.pending_error = Some(CliError::PaginationCycle(cursor));
            }
        }
        Some(Ok(response))
    }
}

pub struct Walker<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> Walker<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub fn pages(&self, path: &str, query: Query) -> Pages<'a, E> {
        Pages::new(self.executor, Request::get(path).with_query(query))
    }

    /// Fetch a listing and render it.
    ///
    /// Without `follow_all` exactly one request is made; the page is printed as
    /// JSON (status object if empty) or as a table.
    pub fn walk(
        &self,
        path: &str,
        query: Query,
        follow_all: bool,
        output: &OutputMode,
        view: &ResourceView,
        out: &mut dyn Write,
    ) -> Result<()> {
        if !follow_all {
            let response = self.executor.execute(Request::get(path).with_query(query))?;
            return render_page(&response, output, view, out);
        }

        match PageMode::for_output(output) {
            PageMode::BufferedJson => {
                let items = self.collect_json(path, query)?;
                output::write_json(out, &Value::Array(items))
            }
            PageMode::RowStreamed => self.stream_rows(path, query, output, view, out),
        }
    }

    /// Every page's array elements concatenated in page order
    pub fn collect_json(&self, path: &str, query: Query) -> Result<Vec<Value>> {
        let mut combined = Vec::new();
        for (index, page) in self.pages(path, query).enumerate() {
            let page = page?;
            let items: Vec<Value> = serde_json::from_slice(&page.body)?;
            tracing::debug!("Buffered page {} with {} items", index + 1, items.len());
            combined.extend(items);
        }
        Ok(combined)
    }

    /// Header and rows of the first page, then bare rows for every later page.
    /// Aligned columns keep the widths of earlier pages, widening only when a
    /// later page has longer cells. Output is flushed after each page.
    pub fn stream_rows(
        &self,
        path: &str,
        query: Query,
        output: &OutputMode,
        view: &ResourceView,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut widths = ColumnWidths::default();
        for (index, page) in self.pages(path, query).enumerate() {
            let page = page?;
            let rows = view.decode_rows(&page.body)?;
            let headers = if index == 0 {
                output.table_headers(view.headers)
            } else {
                None
            };
            output::write_table_with(out, headers, &rows, output.table_style(), &mut widths)?;
            out.flush()?;
            tracing::debug!("Streamed page {} with {} rows", index + 1, rows.len());
        }
        Ok(())
    }
}

fn render_page(
    response: &Response,
    output: &OutputMode,
    view: &ResourceView,
    out: &mut dyn Write,
) -> Result<()> {
    if output.json {
        return output::write_json_response(out, response);
    }
    let rows = view.decode_rows(&response.body)?;
    output::write_table(out, output.table_headers(view.headers), &rows, output.table_style())
}
