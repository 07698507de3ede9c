use cardapio::{App, render};
use cardapio_mealplan::suggestion;
use cardapio_shared::{mealplan::MealType, suggestion::SuggestionRequest};
use time::Date;

use super::print_json;

#[tracing::instrument(skip(app))]
pub async fn week(app: App, date: Option<Date>, json: bool) -> anyhow::Result<()> {
    let session = app.session().await?;
    let query = app.query(app.api(&session)?);
    let view = query
        .week_view(&session.user_id, date.unwrap_or_else(|| query.today()))
        .await;

    if json {
        return print_json(&view);
    }

    println!("{}", render::week(&view, app.locale()));

    Ok(())
}

#[tracing::instrument(skip(app))]
pub async fn month(app: App, date: Option<Date>, json: bool) -> anyhow::Result<()> {
    let session = app.session().await?;
    let query = app.query(app.api(&session)?);
    let view = query
        .month_view(&session.user_id, date.unwrap_or_else(|| query.today()))
        .await;

    if json {
        return print_json(&view);
    }

    println!("{}", render::month(&view, app.locale()));

    Ok(())
}

#[tracing::instrument(skip(app))]
pub async fn stats(app: App, date: Option<Date>, json: bool) -> anyhow::Result<()> {
    let session = app.session().await?;
    let query = app.query(app.api(&session)?);
    let progress = query
        .week_progress(&session.user_id, date.unwrap_or_else(|| query.today()))
        .await;

    if json {
        return print_json(&progress);
    }

    println!("{}", render::progress(&progress));

    Ok(())
}

#[tracing::instrument(skip(app))]
pub async fn suggest(
    app: App,
    meal_type: MealType,
    date: Option<Date>,
    limit: u16,
    json: bool,
) -> anyhow::Result<()> {
    let session = app.session().await?;
    let query = app.query(app.api(&session)?);
    let candidates = query
        .suggestions(&SuggestionRequest {
            user_id: session.user_id.to_owned(),
            date: date.unwrap_or_else(|| query.today()),
            meal_type,
            limit,
        })
        .await;

    let ranked = suggestion::rank(
        suggestion::filter_by_meal_type(&candidates, meal_type),
        app.locale(),
    );

    if json {
        return print_json(&ranked);
    }

    println!("{}", render::suggestions(&ranked));

    Ok(())
}
