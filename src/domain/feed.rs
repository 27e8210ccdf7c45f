/// One entry of the feed list: where a feed lives and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub url: String,
    pub title: String,
}

impl FeedDescriptor {
    pub fn new(url: String, title: String) -> Self {
        Self { url, title }
    }
}
