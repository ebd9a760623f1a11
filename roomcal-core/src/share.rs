//! Shareable search links: the query lives in the `query` URL parameter.

use url::Url;

pub const QUERY_PARAM: &str = "query";

/// `base` with its `query` parameter set to `query`, or removed when the
/// query is empty. Other parameters are left alone.
pub fn share_url(base: &Url, query: &str) -> Url {
    let mut url = base.clone();
    let others: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    if others.is_empty() && query.is_empty() {
        return url;
    }

    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
        if !query.is_empty() {
            pairs.append_pair(QUERY_PARAM, query);
        }
    }
    url
}

/// The query stored in `url`, or an empty string.
pub fn query_from_url(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}
