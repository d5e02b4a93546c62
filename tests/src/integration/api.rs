//! HTTP facade tests, driven through the router without binding a port.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::integration::support::{app, body_json, get, post, post_json};

    #[tokio::test]
    async fn snapshot_lists_the_seeded_world() {
        let response = app().oneshot(get("/snapshot")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let villages = json["villages"].as_array().unwrap();
        assert_eq!(villages.len(), 1);
        assert_eq!(villages[0]["name"], "Capitale");
        assert_eq!(villages[0]["resources"]["wood"], 800);
    }

    #[tokio::test]
    async fn village_round_trip_and_missing_id() {
        let app = app();
        let response = app.clone().oneshot(get("/village/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], 1);

        let response = app.oneshot(get("/village/9999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn build_commands_append_to_the_queue() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/cmd/build",
                json!({"villageId": 1, "building": "farm", "levelTarget": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["accepted"], true);

        let response = app.oneshot(get("/village/1")).await.unwrap();
        let village = body_json(response).await;
        assert_eq!(village["queue"][0], "farm -> L2");
    }

    #[tokio::test]
    async fn refused_build_commands_are_422() {
        let app = app();
        for body in [
            json!({"villageId": 9999, "building": "farm", "levelTarget": 1}),
            json!({"villageId": 1, "building": "", "levelTarget": 0}),
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/cmd/build", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn tick_accrues_and_replays_empty() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post("/cmd/tick?now=2025-10-22T13:00:00Z"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let delta = body_json(response).await;
        assert_eq!(delta["resources_changed"]["1"]["wood"], 60);
        assert_eq!(delta["resources_changed"]["1"]["crop"], 30);
        assert!(delta["builds_completed"].as_array().unwrap().is_empty());

        // Same instant again: nothing changes.
        let response = app
            .oneshot(post("/cmd/tick?now=2025-10-22T13:00:00Z"))
            .await
            .unwrap();
        let delta = body_json(response).await;
        assert!(delta["resources_changed"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn tick_accepts_naive_timestamps() {
        let response = app()
            .oneshot(post("/cmd/tick?now=2025-10-22T13:30:00"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let delta = body_json(response).await;
        // 90 minutes at 60/h, floored.
        assert_eq!(delta["resources_changed"]["1"]["wood"], 90);
    }

    #[tokio::test]
    async fn gameplay_rules_dump_matches_v1() {
        let response = app().oneshot(get("/rules")).await.unwrap();
        let rules = body_json(response).await;
        assert_eq!(rules["version"], "v1");
        assert_eq!(rules["base_rates"]["lumber_mill"], 60.0);
        assert_eq!(rules["base_rates"]["farm"], 30.0);
        assert_eq!(rules["base_costs"]["farm"], 50.0);
        assert_eq!(rules["base_durations_s"]["farm"], 45.0);
    }

    #[tokio::test]
    async fn diplomacy_propose_suggest_and_tick_flow() {
        let app = app();

        // No relation exists between factions 5 and 6, so a proposal
        // between them is rejected.
        let response = app
            .clone()
            .oneshot(post_json(
                "/ai/diplomacy/propose",
                json!({"from": 5, "to": 6, "type": "TRADE"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome = body_json(response).await;
        assert_eq!(outcome["accepted"], false);
        assert_eq!(outcome["reason"], "relation_not_found");

        // Factions 1 and 2 start with a NEUTRAL relation, so a ceasefire
        // between them goes through.
        let response = app
            .clone()
            .oneshot(post_json(
                "/ai/diplomacy/propose",
                json!({"from": 2, "to": 1, "type": "CEASEFIRE", "duration_h": 6}),
            ))
            .await
            .unwrap();
        let outcome = body_json(response).await;
        assert_eq!(outcome["accepted"], true);
        assert!(outcome["treaty_id"].is_u64());

        // Duplicate of the same active kind is refused.
        let response = app
            .clone()
            .oneshot(post_json(
                "/ai/diplomacy/propose",
                json!({"from": 1, "to": 2, "type": "CEASEFIRE"}),
            ))
            .await
            .unwrap();
        let outcome = body_json(response).await;
        assert_eq!(outcome["accepted"], false);
        assert_eq!(outcome["reason"], "already_active");

        // Suggestions come back ranked, ceasefire blocked-by-nothing here.
        let response = app
            .clone()
            .oneshot(get("/ai/diplomacy/suggest?a=1&b=2&k=3"))
            .await
            .unwrap();
        let json = body_json(response).await;
        let suggestions = json["suggestions"].as_array().unwrap();
        assert!(!suggestions.is_empty());
        assert!(suggestions[0]["score"].is_i64());

        // A tick past the expiry retires the treaty.
        let response = app
            .oneshot(post("/ai/diplomacy/tick?now=2025-10-22T19:00:00Z"))
            .await
            .unwrap();
        let report = body_json(response).await;
        assert_eq!(report["expired_treaties"].as_array().unwrap().len(), 1);
        assert_eq!(report["events"][0]["kind"], "tick_update");
    }

    #[tokio::test]
    async fn invalid_treaty_type_is_422() {
        let response = app()
            .oneshot(post_json(
                "/ai/diplomacy/propose",
                json!({"from": 1, "to": 2, "type": "VASSALAGE"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn diplomacy_rules_dump_matches_diplo_v1() {
        let response = app().oneshot(get("/ai/diplomacy/rules")).await.unwrap();
        let rules = body_json(response).await;
        assert_eq!(rules["version"], "diplo_v1");
        assert_eq!(rules["cooldown_factor"], 0.98);
        assert_eq!(rules["ally_threshold"], 40.0);
        assert_eq!(rules["hostile_threshold"], -40.0);
        assert_eq!(rules["ceasefire_duration_h"], 12);
    }
}
