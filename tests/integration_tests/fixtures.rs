//! Sample inputs for integration tests

/// Pasted comments in every supported line format
pub const PASTED_COMMENTS: &str = "\
@alice: Great giveaway! #win @bob
bob_smith - me too
carol | tagging @dave and @erin #giveaway #win
winbot123: free followers at @spam_link #win
   
dave_k love this @alice #giveaway
ALICE: second try @carol #win
lonely";

/// One page of Graph API comments with a reply
pub const GRAPH_PAGE: &str = r#"{
  "data": [
    {
      "id": "17890000000000001",
      "text": "Entering with @bob and @carol #giveaway",
      "username": "alice_w",
      "timestamp": "2024-03-01T12:00:00+0000",
      "like_count": 12,
      "replies": {
        "data": [
          {
            "id": "17890000000000002",
            "text": "good luck @alice_w",
            "username": "bob",
            "timestamp": "2024-03-01T12:05:00+0000"
          }
        ]
      }
    },
    {
      "id": "17890000000000003",
      "text": "Me please @dave #giveaway",
      "username": "carol",
      "timestamp": "2024-03-01T13:00:00+0000",
      "like_count": 3
    }
  ],
  "paging": {}
}"#;

/// A saved post page as the browser renders it
pub const POST_PAGE_HTML: &str = r#"
<html><body><article><ul>
  <li><div>
    <a href="/alice_w/" role="link">alice_w</a>
    <span>Love this! @bob @carol #giveaway</span>
  </div></li>
  <li><div>
    <a href="/carol.j/" role="link">carol.j</a>
    <span>Count me in @dave #giveaway</span>
  </div></li>
</ul></article></body></html>
"#;
