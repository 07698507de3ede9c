use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
};
use cardapio_api::{ApiError, HttpApi, HttpApiConfig, MealPlanApi};
use cardapio_shared::{
    DateRange,
    mealplan::{MealPlanEntryPatch, MealType, NewMealPlanEntry},
    suggestion::SuggestionRequest,
};
use serde_json::{Value, json};
use time::macros::date;

async fn serve(router: Router) -> anyhow::Result<HttpApi> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, Router::new().nest("/api", router)).await;
    });

    Ok(HttpApi::new(&HttpApiConfig::new(format!("http://{addr}/api")))?)
}

fn entry_json(id: &str, date: &str, meal_type: &str) -> Value {
    json!({
        "id": id,
        "userId": "u1",
        "date": date,
        "mealType": meal_type,
        "recipeId": format!("recipe-{id}"),
        "servings": 2,
        "completed": false,
        "createdAt": "2024-01-01T10:00:00Z",
        "updatedAt": "2024-01-01T10:00:00Z"
    })
}

#[tokio::test]
async fn list_entries_sends_range_and_decodes_entries() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("userId").map(String::as_str), Some("u1"));
            assert_eq!(params.get("startDate").map(String::as_str), Some("2024-01-01"));
            assert_eq!(params.get("endDate").map(String::as_str), Some("2024-01-07"));

            Json(json!([
                entry_json("1", "2024-01-03", "breakfast"),
                entry_json("2", "2024-01-03", "snack"),
            ]))
        }),
    );
    let api = serve(router).await?;

    let entries = api
        .list_entries(
            "u1",
            DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 07)),
        )
        .await?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, date!(2024 - 01 - 03));
    assert_eq!(entries[1].meal_type, MealType::Snack);
    assert!(entries[0].created_at.is_some());

    Ok(())
}

#[tokio::test]
async fn rejection_carries_server_message() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "Receita indisponível" })),
            )
        }),
    );
    let api = serve(router).await?;

    let err = api
        .create_entry(&NewMealPlanEntry {
            user_id: "u1".to_owned(),
            meal_plan_id: Some("p1".to_owned()),
            recipe_id: "r1".to_owned(),
            date: date!(2024 - 01 - 03),
            meal_type: MealType::Dinner,
            servings: 2,
            notes: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 422, .. }));
    assert_eq!(err.server_message(), Some("Receita indisponível"));

    Ok(())
}

#[tokio::test]
async fn rejection_without_body_has_no_message() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans/{id}",
        delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let api = serve(router).await?;

    let err = api.delete_entry("e1").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.server_message(), None);

    Ok(())
}

#[tokio::test]
async fn delete_accepts_empty_success_body() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans/{id}",
        delete(|Path(id): Path<String>| async move {
            assert_eq!(id, "e1");
            StatusCode::NO_CONTENT
        }),
    );
    let api = serve(router).await?;

    api.delete_entry("e1").await?;

    Ok(())
}

#[tokio::test]
async fn update_sends_only_changed_fields() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans/{id}",
        patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(body, json!({ "servings": 4 }));

            let mut entry = entry_json(&id, "2024-01-03", "lunch");
            entry["servings"] = body["servings"].clone();
            Json(entry)
        }),
    );
    let api = serve(router).await?;

    let entry = api
        .update_entry("e9", &MealPlanEntryPatch::servings(4))
        .await?;

    assert_eq!(entry.id, "e9");
    assert_eq!(entry.servings, 4);

    Ok(())
}

#[tokio::test]
async fn missing_active_plan_is_none() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans/active",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" }))) }),
    );
    let api = serve(router).await?;

    assert_eq!(api.active_plan("u1").await?, None);

    Ok(())
}

#[tokio::test]
async fn suggestions_forward_meal_type_and_limit() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/meal-plans/suggestions",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("mealType").map(String::as_str), Some("dinner"));
            assert_eq!(params.get("limit").map(String::as_str), Some("5"));

            Json(json!([
                {
                    "recipeId": "r1",
                    "score": 0.91,
                    "reasons": ["Combina com suas preferências"],
                    "mealType": "dinner",
                    "date": "2024-01-03"
                }
            ]))
        }),
    );
    let api = serve(router).await?;

    let suggestions = api
        .suggestions(&SuggestionRequest {
            user_id: "u1".to_owned(),
            date: date!(2024 - 01 - 03),
            meal_type: MealType::Dinner,
            limit: 5,
        })
        .await?;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].reasons.len(), 1);

    Ok(())
}

#[tokio::test]
async fn bearer_token_is_forwarded() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/users/{user_id}/meal-plan-preferences",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer secret");

            if !authorized {
                return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
            }

            (
                StatusCode::OK,
                Json(json!({ "dietaryRestrictions": ["vegetarian"], "varietyLevel": "high" })),
            )
        }),
    );
    let api = serve(router).await?;

    let err = api.preferences("u1").await.unwrap_err();
    assert_eq!(err.server_message(), Some("unauthorized"));

    let prefs = api
        .with_token(Some("secret".to_owned()))
        .preferences("u1")
        .await?;
    assert_eq!(prefs.dietary_restrictions, vec!["vegetarian".to_owned()]);

    Ok(())
}
