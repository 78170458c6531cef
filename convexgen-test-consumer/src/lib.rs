//! Test consumer crate that compiles bindings generated from `catalog.json`.

include!(concat!(env!("OUT_DIR"), "/convex_api.rs"));

#[cfg(test)]
mod tests {
    use super::api;
    use convexgen_core::{
        BuildError, Bytes, ConvexFunction, Float64, FunctionKind, Int64, Nullable, decode_output,
        encode_args,
    };
    use serde_json::json;

    fn create_args() -> api::tasks::create::Args {
        api::tasks::create::Args::builder()
            .text("Write tests")
            .priority(5i64)
            .attachment(vec![1u8, 2, 3])
            .note(None)
            .build()
            .expect("Failed to build args")
    }

    #[test]
    fn test_binding_constants() {
        assert_eq!(api::tasks::Create::IDENTIFIER, "tasks.js:create");
        assert_eq!(api::tasks::Create::KIND, FunctionKind::Mutation);
        assert_eq!(api::tasks::Get::KIND, FunctionKind::Query);
        assert_eq!(api::search::Run::KIND, FunctionKind::Action);
        assert_eq!(api::stats::Total::IDENTIFIER, "stats.js:total");
    }

    #[test]
    fn test_builder_round_trip() {
        let args = create_args();
        assert_eq!(args.priority, Int64(5));
        assert_eq!(args.attachment, Some(Bytes(vec![1, 2, 3])));
        assert_eq!(args.note, Some(Nullable::null()));
        assert!(args.tags.is_empty());

        let encoded = serde_json::to_value(&args).expect("Failed to encode");
        assert_eq!(
            encoded,
            json!({
                "text": "Write tests",
                "priority": { "$integer": "BQAAAAAAAAA=" },
                "attachment": { "$bytes": "AQID" },
                "note": null,
                "tags": []
            })
        );

        let decoded: api::tasks::create::Args =
            serde_json::from_value(encoded).expect("Failed to decode");
        assert_eq!(decoded, args);
    }

    #[test]
    fn test_builder_missing_required_field() {
        let err = api::tasks::create::Args::builder()
            .text("no priority")
            .build()
            .expect_err("build without priority must fail");
        assert!(matches!(
            err,
            BuildError::MissingField { ty: "Args", field: "priority" }
        ));
    }

    #[test]
    fn test_optional_nullable_field() {
        let absent: api::tasks::create::Args = serde_json::from_value(json!({
            "text": "a",
            "priority": { "$integer": "AQAAAAAAAAA=" },
            "tags": ["x"]
        }))
        .expect("Failed to decode");
        assert_eq!(absent.note, None);
        assert_eq!(absent.attachment, None);

        let null: api::tasks::create::Args = serde_json::from_value(json!({
            "text": "a",
            "priority": { "$integer": "AQAAAAAAAAA=" },
            "note": null,
            "tags": []
        }))
        .expect("Failed to decode");
        assert_eq!(null.note, Some(Nullable::null()));

        let value = api::tasks::create::Args::builder()
            .text("a")
            .priority(1i64)
            .note(Some("later".to_string()))
            .build()
            .expect("Failed to build args");
        let encoded = serde_json::to_value(&value).expect("Failed to encode");
        assert_eq!(encoded["note"], json!("later"));
        assert!(encoded.get("attachment").is_none());
    }

    #[test]
    fn test_encode_args() {
        let call = api::tasks::Create::new(create_args());
        let args = encode_args(&call).expect("Failed to encode args");
        assert_eq!(args["text"], "\"Write tests\"");
        assert_eq!(args["priority"], r#"{"$integer":"BQAAAAAAAAA="}"#);
        assert_eq!(args["attachment"], r#"{"$bytes":"AQID"}"#);
        assert_eq!(args["note"], "null");

        let empty = encode_args(&api::stats::Total).expect("Failed to encode args");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_tagged_union_with_null() {
        let found = decode_output::<api::tasks::Get>(r#"{"status":"found","score":0.5}"#)
            .expect("Failed to decode");
        assert_eq!(
            found,
            Nullable::new(api::tasks::get::Output::Found { score: Float64(0.5) })
        );

        let archived = decode_output::<api::tasks::Get>(r#"{"status":"archived","reason":"old"}"#)
            .expect("Failed to decode");
        assert_eq!(
            archived,
            Nullable::new(api::tasks::get::Output::Archived {
                reason: "old".to_string()
            })
        );

        let null = decode_output::<api::tasks::Get>("null").expect("Failed to decode");
        assert!(null.is_null());

        assert!(decode_output::<api::tasks::Get>(r#"{"status":"lost"}"#).is_err());
    }

    #[test]
    fn test_untagged_primitive_union() {
        let plain = decode_output::<api::stats::Total>("5").expect("Failed to decode");
        assert_eq!(plain, api::stats::total::Output::DoubleValue(Float64(5.0)));

        let boxed = decode_output::<api::stats::Total>(r#"{"$integer":"BQAAAAAAAAA="}"#)
            .expect("Failed to decode");
        assert_eq!(boxed, api::stats::total::Output::IntValue(Int64(5)));

        let encoded = serde_json::to_value(&boxed).expect("Failed to encode");
        assert_eq!(encoded, json!({ "$integer": "BQAAAAAAAAA=" }));
    }

    #[test]
    fn test_mixed_union_falls_back_to_untagged() {
        let hit = decode_output::<api::search::Run>(r#"{"kind":"hit","score":2}"#)
            .expect("Failed to decode");
        assert_eq!(hit, api::search::run::Output::Hit { score: Float64(2.0) });

        let miss = decode_output::<api::search::Run>(r#"{"kind":"miss"}"#).expect("Failed to decode");
        assert_eq!(miss, api::search::run::Output::Miss {});

        let text = decode_output::<api::search::Run>(r#""no index""#).expect("Failed to decode");
        assert_eq!(
            text,
            api::search::run::Output::StringValue("no index".to_string())
        );
        assert_eq!(
            serde_json::to_value(&text).expect("Failed to encode"),
            json!("no index")
        );
        assert_eq!(
            serde_json::to_value(&hit).expect("Failed to encode"),
            json!({ "kind": "hit", "score": 2.0 })
        );
    }

    #[test]
    fn test_call_from_args() {
        let args = api::search::run::Args::builder()
            .query("rust")
            .build()
            .expect("Failed to build args");
        let call: api::search::Run = args.clone().into();
        assert_eq!(call.args(), &args);
        assert_eq!(
            encode_args(&call).expect("Failed to encode args")["query"],
            "\"rust\""
        );
    }
}
