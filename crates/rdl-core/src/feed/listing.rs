//! Decode reddit listing JSON into submissions and flattened comment threads.

use serde::Deserialize;
use serde_json::Value;

use super::{Comment, DiscoveryError, Submission};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

/// `{ "kind": "t3", "data": {...} }`; data is decoded once the kind is known.
#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    permalink: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    body: String,
    /// Empty string when there are no replies, otherwise a nested listing.
    #[serde(default)]
    replies: Value,
}

/// Parse a submission listing (`/r/<sub>/new.json`), keeping listing order.
pub fn parse_submissions(json: &[u8]) -> Result<Vec<Submission>, DiscoveryError> {
    let listing: Listing = serde_json::from_slice(json)?;
    let mut out = Vec::with_capacity(listing.data.children.len());
    for thing in listing.data.children {
        if thing.kind != "t3" {
            continue;
        }
        let link: LinkData = serde_json::from_value(thing.data)?;
        out.push(Submission {
            id: link.id,
            title: link.title,
            url: link.url,
            permalink: link.permalink,
        });
    }
    Ok(out)
}

/// Parse a comment page (`/comments/<id>.json`): a two-element array of the
/// submission listing and the comment listing. Returns every comment,
/// depth-first with parents before their replies; `more` stubs are skipped.
pub fn parse_comment_thread(json: &[u8]) -> Result<Vec<Comment>, DiscoveryError> {
    let pages: Vec<Listing> = serde_json::from_slice(json)?;
    let mut out = Vec::new();
    if let Some(comments) = pages.into_iter().nth(1) {
        flatten(comments, &mut out)?;
    }
    Ok(out)
}

fn flatten(listing: Listing, out: &mut Vec<Comment>) -> Result<(), DiscoveryError> {
    for thing in listing.data.children {
        if thing.kind != "t1" {
            continue;
        }
        let data: CommentData = serde_json::from_value(thing.data)?;
        out.push(Comment { body: data.body });
        if data.replies.is_object() {
            let replies: Listing = serde_json::from_value(data.replies)?;
            flatten(replies, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submissions_in_listing_order() {
        let json = br#"{
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "children": [
                    { "kind": "t3", "data": {
                        "id": "a", "title": "Highlights",
                        "url": "https://www.youtube.com/watch?v=aaa",
                        "permalink": "/r/rugbyunion/comments/a/highlights/" } },
                    { "kind": "t3", "data": {
                        "id": "b", "title": "Match thread",
                        "url": "https://www.reddit.com/r/rugbyunion/comments/b/",
                        "permalink": "/r/rugbyunion/comments/b/match_thread/" } }
                ]
            }
        }"#;
        let subs = parse_submissions(json).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].id, "a");
        assert_eq!(subs[0].url, "https://www.youtube.com/watch?v=aaa");
        assert_eq!(subs[1].title, "Match thread");
        assert_eq!(subs[1].permalink, "/r/rugbyunion/comments/b/match_thread/");
    }

    #[test]
    fn comment_tree_flattened_parents_first() {
        let json = br#"[
            { "kind": "Listing", "data": { "children": [
                { "kind": "t3", "data": { "id": "a", "title": "t", "url": "u", "permalink": "p" } }
            ] } },
            { "kind": "Listing", "data": { "children": [
                { "kind": "t1", "data": {
                    "body": "first",
                    "replies": { "kind": "Listing", "data": { "children": [
                        { "kind": "t1", "data": { "body": "reply", "replies": "" } }
                    ] } } } },
                { "kind": "t1", "data": { "body": "second", "replies": "" } },
                { "kind": "more", "data": { "count": 12, "children": ["x", "y"] } }
            ] } }
        ]"#;
        let comments = parse_comment_thread(json).unwrap();
        let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "reply", "second"]);
    }

    #[test]
    fn malformed_listing_is_decode_error() {
        let err = parse_submissions(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, DiscoveryError::Decode(_)));
    }
}
