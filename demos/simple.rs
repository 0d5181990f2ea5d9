use std::time::Duration;

use async_trait::async_trait;
use twitter_provider_rs::{BatchFunction, Batcher, RequestContext};

// Empty functor that implements the BatchFunction trait. For this example, it resolves keys
// against a fixed listing, as a remote "list everything" endpoint would.
struct MyBatchFn;

#[async_trait]
impl BatchFunction<i64, String> for MyBatchFn {
    type Context = Vec<(i64, String)>;
    type Error = std::convert::Infallible;

    async fn load(keys: &[i64], listing: &Self::Context) -> Result<Vec<Option<String>>, Self::Error> {
        println!("fetching listing for {} keys", keys.len());
        Ok(keys
            .iter()
            .map(|k| listing.iter().find(|(id, _)| id == k).map(|(_, name)| name.clone()))
            .collect())
    }
}

#[tokio::main]
async fn main() {
    let listing = vec![
        (2001, "a space odyssey".to_owned()),
        (7, "samurai".to_owned()),
        (12, "angry men".to_owned()),
    ];

    let batcher = Batcher::with_window(MyBatchFn {}, listing, Duration::from_millis(200));
    let ctx = RequestContext::background();

    // Issued together, these share a single fetch.
    let (a, b, c) = futures::join!(batcher.get(&ctx, 7), batcher.get(&ctx, 15), batcher.get(&ctx, 2001));
    assert_eq!(a.unwrap().as_deref(), Some("samurai"));
    assert_eq!(b.unwrap(), None);
    assert_eq!(c.unwrap().as_deref(), Some("a space odyssey"));

    println!("{:?}", batcher.stats());
}
