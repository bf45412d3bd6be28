use proptest::prelude::*;

use m3u_channels::descriptor::{decode_descriptor, encode_descriptor};
use m3u_channels::ingestor::M3uParser;
use m3u_channels::models::{DrmParams, HttpHeaders, ParsedChannel};

fn stream_url() -> impl Strategy<Value = String> {
    "https?://[a-z]{1,10}\\.example\\.com(/[a-z0-9_.-]{1,12}){0,3}"
}

fn header_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9=:/.,;_-]{1,10}( [A-Za-z0-9=:/.,;_-]{1,10}){0,3}"
}

fn cookie() -> impl Strategy<Value = String> {
    "[a-z]{1,6}=[a-z0-9]{1,6}(; [a-z]{1,6}=[a-z0-9=]{1,6}){0,3}"
}

fn drm() -> impl Strategy<Value = DrmParams> {
    let scheme = proptest::option::of(prop_oneof![
        Just("clearkey".to_string()),
        Just("widevine".to_string()),
        Just("com.microsoft.playready".to_string()),
    ]);
    let license = proptest::option::of(prop_oneof![
        "[0-9a-f]{32}:[0-9a-f]{32}(,[0-9a-f]{32}:[0-9a-f]{32}){0,2}",
        "https://license\\.example\\.com/[a-z]{1,8}",
    ]);
    (scheme, license).prop_map(|(scheme, license)| DrmParams { scheme, license })
}

prop_compose! {
    fn channel()(
        stream_url in stream_url(),
        user_agent in proptest::option::of("[A-Za-z0-9/.();_-]{1,8}( [A-Za-z0-9/.();_-]{1,8}){0,3}"),
        extra in proptest::collection::vec(("X-[A-Za-z][A-Za-z0-9]{0,8}", header_value()), 0..4),
        cookie in proptest::option::of(cookie()),
        referer in proptest::option::of(stream_url()),
        drm in drm(),
    ) -> ParsedChannel {
        let mut headers: HttpHeaders = extra.into_iter().collect();
        if let Some(cookie) = cookie {
            headers.insert("Cookie", cookie);
        }
        if let Some(referer) = referer {
            headers.insert("Referer", referer);
        }
        ParsedChannel {
            name: "Generated".to_string(),
            stream_url,
            user_agent,
            headers,
            drm,
            ..ParsedChannel::default()
        }
    }
}

/// Key spellings playlists use in the wild, synonyms and DRM keys included
fn param_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(vec![
            "referrer", "Referer", "REFERER", "useragent", "User-Agent", "user-agent",
            "origin", "cookie", "drmScheme", "drmscheme", "DRMLICENSE", "drmLicense",
        ])
        .prop_map(str::to_string),
        2 => "x-[a-z]{1,6}",
    ]
}

/// Values with optional whitespace padding on either edge
fn padded_value() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-z0-9=:/.,;_-]{0,10}[ ]{0,2}"
}

prop_compose! {
    fn playlist()(
        stream_url in stream_url(),
        http_params in proptest::collection::vec((param_key(), padded_value()), 0..6),
        inline_params in proptest::collection::vec((param_key(), padded_value()), 0..4),
    ) -> String {
        let http: serde_json::Map<String, serde_json::Value> = http_params
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        let inline: String = inline_params
            .iter()
            .map(|(key, value)| format!("|{key}={value}"))
            .collect();
        format!(
            "#EXTM3U\n#EXTINF:-1,Generated\n#EXTHTTP:{}\n{stream_url}{inline}\n",
            serde_json::Value::Object(http)
        )
    }
}

proptest! {
    #[test]
    fn test_parsed_channels_survive_encode_decode(content in playlist()) {
        let report = M3uParser::new("Unknown Channel").parse(&content);
        prop_assert_eq!(report.channels.len(), 1);
        let channel = &report.channels[0];

        let decoded = decode_descriptor(&encode_descriptor(channel));
        prop_assert_eq!(&decoded.url, &channel.stream_url);
        prop_assert_eq!(&decoded.headers, &channel.request_headers());
        prop_assert_eq!(&decoded.drm, &channel.drm);
    }

    #[test]
    fn test_decode_inverts_encode(channel in channel()) {
        let decoded = decode_descriptor(&encode_descriptor(&channel));

        prop_assert_eq!(&decoded.url, &channel.stream_url);
        prop_assert_eq!(&decoded.headers, &channel.request_headers());
        prop_assert_eq!(&decoded.drm, &channel.drm);
        prop_assert_eq!(decoded.user_agent(), channel.user_agent.as_deref());
    }

    #[test]
    fn test_decode_never_panics(input in "\\PC{0,200}") {
        let _ = decode_descriptor(&input);
    }
}

#[test]
fn test_pipe_in_value_is_a_known_limitation() {
    let mut channel = ParsedChannel {
        stream_url: "http://example.com/a.ts".to_string(),
        ..ParsedChannel::default()
    };
    channel.headers.insert("X-Token", "left|right");

    let decoded = decode_descriptor(&encode_descriptor(&channel));
    assert_eq!(decoded.headers.get("X-Token"), Some("left"));
}
