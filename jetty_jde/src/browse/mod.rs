//! Table browsing and pagination over the AIS data service.
//!
//! A listing starts with [`JdeRestClient::list_first_page`]. Each page
//! carries an optional [`Cursor`]; while one is present, hand it to
//! [`JdeRestClient::list_next_page`] to get the following page. A missing
//! cursor means the listing is done (v1 servers never produce one).

mod tables;

pub use tables::*;

use std::fmt::Display;

use jetty_core::logging::debug;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts;
use crate::error::{JdeError, JdeResult};
use crate::protocol::Paging;
use crate::rest::models::{BrowseEnvelope, BrowseForm, ConditionBody, DataRequest, Query, ValueBody};
use crate::rest::{FetchJson, JdeRestClient};

/// A browsable JDE table with typed rows.
pub trait Table {
    /// What each row decodes into
    type Row: DeserializeOwned + Send;

    /// The fixed query for this table
    fn query(&self) -> TableQuery;
}

/// Comparison operators for query conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Exact match
    Equal,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "EQUAL",
        }
    }
}

/// A filter on a single column against a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    control_id: String,
    operator: Operator,
    literal: String,
}

impl Condition {
    /// `control_id` must equal `literal` exactly.
    pub fn equal(control_id: &str, literal: &str) -> Self {
        Self {
            control_id: control_id.to_owned(),
            operator: Operator::Equal,
            literal: literal.to_owned(),
        }
    }
}

/// A browse of one table: which columns come back and which rows match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table_name: String,
    return_columns: Vec<String>,
    conditions: Vec<Condition>,
    requested_page_size: Option<u32>,
}

impl TableQuery {
    /// Browse `return_columns` (in order) of `table_name`.
    pub fn new(table_name: &str, return_columns: &[&str]) -> Self {
        Self {
            table_name: table_name.to_owned(),
            return_columns: return_columns.iter().map(|c| c.to_string()).collect(),
            conditions: vec![],
            requested_page_size: None,
        }
    }

    /// Add a filter condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Record the page size the caller asked for. Servers that can't
    /// paginate ignore it.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.requested_page_size = Some(page_size);
        self
    }

    /// The page size asked for, if any
    pub fn requested_page_size(&self) -> Option<u32> {
        self.requested_page_size
    }

    /// The JDE table name (e.g. `F0092`)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Key of the form holding the results in a browse response
    fn form_name(&self) -> String {
        format!("fs_DATABROWSE_{}", self.table_name)
    }

    fn to_request(&self, paging: Paging) -> DataRequest {
        let query = (!self.conditions.is_empty()).then(|| Query {
            auto_find: true,
            condition: self
                .conditions
                .iter()
                .map(|c| ConditionBody {
                    control_id: c.control_id.to_owned(),
                    operator: c.operator.as_str().to_owned(),
                    value: vec![ValueBody {
                        content: c.literal.to_owned(),
                        special_value_id: "LITERAL",
                    }],
                })
                .collect(),
        });

        DataRequest {
            target_name: self.table_name.to_owned(),
            target_type: "table",
            data_service_type: "BROWSE",
            find_on_entry: "true",
            return_control_ids: self.return_columns.join("|"),
            max_page_size: paging.max_page_size,
            enable_next_page_processing: paging.next_page_processing.to_string(),
            output_type: "GRID_DATA",
            query,
        }
    }
}

/// Where the next page of a listing lives: an opaque, server-issued url.
///
/// A cursor is good for exactly one fetch, so fetching consumes it. It can
/// be stored as a plain string between sync runs with
/// [`Cursor::into_bookmark`] and restored with [`Cursor::from_bookmark`].
/// It also serializes as that plain string; deserializing an empty string
/// fails, since an empty bookmark is no cursor at all.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub(crate) fn new(link: String) -> Self {
        Cursor(link)
    }

    /// The raw link
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Turn the cursor into a string to persist.
    pub fn into_bookmark(self) -> String {
        self.0
    }

    /// Restore a persisted cursor. An empty bookmark means there's nothing
    /// left to fetch.
    pub fn from_bookmark(bookmark: String) -> Option<Self> {
        (!bookmark.is_empty()).then_some(Cursor(bookmark))
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bookmark = String::deserialize(deserializer)?;
        Cursor::from_bookmark(bookmark)
            .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(""), &"a continuation link"))
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One round trip's worth of rows.
#[derive(Debug)]
pub struct Page<R> {
    /// Rows, in server order
    pub rows: Vec<R>,
    /// Cursor for the following page, if any
    pub next: Option<Cursor>,
}

impl<R> Page<R> {
    /// Whether this is the final page of the listing
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Progress through a listing.
#[derive(Debug)]
pub enum BrowseState {
    /// Nothing fetched yet
    NotStarted,
    /// More pages behind the cursor
    Continue(Cursor),
    /// Every page has been fetched
    Exhausted,
}

impl JdeRestClient {
    /// Fetch the first page of `table`. `page_size_hint` is only honored by
    /// v2 servers.
    pub async fn list_first_page<T: Table>(
        &self,
        table: &T,
        page_size_hint: u32,
    ) -> JdeResult<Page<T::Row>> {
        self.browse_page(table, page_size_hint, true).await
    }

    /// Fetch the page behind `cursor`. The cursor's link already encodes the
    /// whole query and is requested exactly as given.
    pub async fn list_next_page<T: Table>(
        &self,
        table: &T,
        cursor: Cursor,
    ) -> JdeResult<Page<T::Row>> {
        if !self.protocol().supports_pagination() {
            return Err(JdeError::ProtocolViolation(format!(
                "{} servers can't follow continuation links",
                self.protocol()
            )));
        }

        let query = table.query();
        debug!("following continuation link for {}", query.table_name());
        let envelope: BrowseEnvelope = self.build_follow_request(&cursor)?.fetch_json().await?;
        self.decode_page(&query, envelope, true)
    }

    /// Walk every page of `table`, collecting all rows.
    pub async fn fetch_all<T: Table>(&self, table: &T, page_size_hint: u32) -> JdeResult<Vec<T::Row>> {
        let mut rows = vec![];
        let mut state = BrowseState::NotStarted;
        loop {
            let page = match state {
                BrowseState::NotStarted => self.list_first_page(table, page_size_hint).await?,
                BrowseState::Continue(cursor) => self.list_next_page(table, cursor).await?,
                BrowseState::Exhausted => break,
            };
            rows.extend(page.rows);
            state = match page.next {
                Some(cursor) => BrowseState::Continue(cursor),
                None => BrowseState::Exhausted,
            };
        }
        Ok(rows)
    }

    pub(crate) async fn browse_page<T: Table>(
        &self,
        table: &T,
        page_size_hint: u32,
        paginate: bool,
    ) -> JdeResult<Page<T::Row>> {
        let query = table.query().with_page_size(page_size_hint);
        let paging = self.protocol().paging(page_size_hint, paginate);
        let next_page_processing = paging.next_page_processing;
        debug!(
            "browsing {} (requested page size {:?}, maxPageSize {:?})",
            query.table_name(),
            query.requested_page_size(),
            paging.max_page_size
        );

        let envelope: BrowseEnvelope = self
            .build_request(consts::DATA_SERVICE, &query.to_request(paging))
            .fetch_json()
            .await?;
        self.decode_page(&query, envelope, next_page_processing)
    }

    fn decode_page<R: DeserializeOwned>(
        &self,
        query: &TableQuery,
        mut envelope: BrowseEnvelope,
        paginate: bool,
    ) -> JdeResult<Page<R>> {
        let form_name = query.form_name();
        let form = envelope
            .forms
            .remove(&form_name)
            .ok_or_else(|| JdeError::Decode(format!("response is missing {form_name}")))?;
        let form: BrowseForm<R> = serde_json::from_value(form)
            .map_err(|e| JdeError::decode(&format!("parsing {form_name}"), e))?;

        let grid = form.data.grid_data;
        let next = self
            .protocol()
            .next_cursor(paginate, &grid.summary, &envelope.links)?;
        debug!(
            "got {} rows from {} ({} reported, more records: {})",
            grid.rowset.len(),
            query.table_name(),
            grid.summary.records,
            next.is_some()
        );

        Ok(Page {
            rows: grid.rowset,
            next,
        })
    }
}
