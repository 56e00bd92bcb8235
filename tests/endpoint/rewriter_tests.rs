/*!
Tests for image URL rewriting rules and their ordering.
*/

use apiscout::core::endpoint::*;

fn rewriter() -> ImageUrlRewriter {
    ImageUrlRewriter::new(Endpoint::parse("http://10.0.0.5:8000").unwrap())
}

#[test]
fn test_rewrite_leading_slash() {
    assert_eq!(
        rewriter().rewrite(Some("/uploads/x.png")),
        "http://10.0.0.5:8000/uploads/x.png"
    );
}

#[test]
fn test_rewrite_relative_path() {
    assert_eq!(
        rewriter().rewrite(Some("uploads/x.png")),
        "http://10.0.0.5:8000/uploads/x.png"
    );
}

#[test]
fn test_rewrite_absolute_url_unchanged() {
    assert_eq!(
        rewriter().rewrite(Some("http://cdn.example.com/y.png")),
        "http://cdn.example.com/y.png"
    );
    assert_eq!(
        rewriter().rewrite(Some("https://cdn.example.com/y.png")),
        "https://cdn.example.com/y.png"
    );
}

#[test]
fn test_rewrite_empty_and_missing_yield_placeholder() {
    assert_eq!(rewriter().rewrite(Some("")), DEFAULT_PLACEHOLDER);
    assert_eq!(rewriter().rewrite(Some("   ")), DEFAULT_PLACEHOLDER);
    assert_eq!(rewriter().rewrite(None), DEFAULT_PLACEHOLDER);
}

#[test]
fn test_rewrite_placeholder_not_prefixed() {
    assert_eq!(rewriter().rewrite(Some(DEFAULT_PLACEHOLDER)), DEFAULT_PLACEHOLDER);
}

#[test]
fn test_rewrite_custom_placeholder() {
    let rewriter = rewriter().with_placeholder("/img/none.svg");
    assert_eq!(rewriter.rewrite(None), "/img/none.svg");
    assert_eq!(rewriter.rewrite(Some("/img/none.svg")), "/img/none.svg");
    // the default placeholder is just another path for this rewriter
    assert_eq!(
        rewriter.rewrite(Some(DEFAULT_PLACEHOLDER)),
        "http://10.0.0.5:8000/assets/placeholder.png"
    );
}

#[test]
fn test_rewrite_against_endpoint_with_base_path() {
    let endpoint = Endpoint::parse("https://api.example.com/backend/").unwrap();
    assert_eq!(
        rewrite_image_url(Some("/uploads/x.png"), &endpoint, DEFAULT_PLACEHOLDER),
        "https://api.example.com/backend/uploads/x.png"
    );
}
