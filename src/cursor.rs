use async_trait::async_trait;

/// Position in a cursor-paged remote listing.
///
/// The remote API hands out opaque cursor values that must be passed back verbatim. Two values
/// are reserved: [`Cursor::START`] asks for the first page and [`Cursor::END`] is returned once
/// there are no further pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(pub i64);

impl Cursor {
    pub const START: Cursor = Cursor(-1);
    pub const END: Cursor = Cursor(0);

    pub fn is_end(self) -> bool {
        self == Self::END
    }
}

impl From<i64> for Cursor {
    fn from(value: i64) -> Self {
        Cursor(value)
    }
}

/// A `PageFetch` performs one remote page request for the given cursor, stores whatever items it
/// received in its own accumulator, and returns the cursor of the next page.
///
/// The walker never sees the items, so the same walker drives listings of any item type.
#[async_trait]
pub trait PageFetch: Send {
    type Error: Send;
    async fn fetch_page(&mut self, cursor: Cursor) -> Result<Cursor, Self::Error>;
}

/// Drives `pages` from [`Cursor::START`] until the remote API returns [`Cursor::END`].
///
/// The first error aborts the walk and is returned as is. Items the fetcher accumulated before the
/// error are left in place, but callers must treat the listing as incomplete.
///
/// There is no page limit: an API that never returns the end cursor keeps the walk going.
pub async fn walk<P>(pages: &mut P) -> Result<(), P::Error>
where
    P: PageFetch + ?Sized,
{
    let mut cursor = Cursor::START;
    let mut fetched = 0usize;
    loop {
        cursor = pages.fetch_page(cursor).await?;
        fetched += 1;
        tracing::trace!(page = fetched, next = cursor.0);
        if cursor.is_end() {
            return Ok(());
        }
    }
}
