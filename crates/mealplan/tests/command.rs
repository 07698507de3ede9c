use cardapio_mealplan::{AddRecipe, Command, Outcome};
use cardapio_shared::{
    mealplan::{CopyWeekRequest, GenerateRequest, MealType},
    user::MealPlanPreferences,
};
use time::macros::date;

use crate::helpers::{FakeApi, RecordingAlert, USER_ID, entry, plan};

mod helpers;

fn command(api: &FakeApi) -> (Command<FakeApi>, RecordingAlert) {
    let alert = RecordingAlert::default();

    (Command::new(api.clone(), alert.clone()), alert)
}

fn add_input(servings: u16) -> AddRecipe {
    AddRecipe {
        user_id: USER_ID.to_owned(),
        recipe_id: "feijoada".to_owned(),
        date: date!(2024 - 01 - 03),
        meal_type: MealType::Lunch,
        servings,
        notes: None,
    }
}

#[tokio::test]
async fn rejection_without_message_alerts_generic_text() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .rejecting(500, None);
    let (command, alert) = command(&api);

    let outcome = command.delete("e1").await;

    let shown = alert.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, "Erro ao remover refeição");
    assert_eq!(
        shown[0].1,
        "Não foi possível concluir a operação. Tente novamente."
    );
    assert_eq!(outcome, Outcome::Failed(shown[0].1.clone()));
    assert!(!shown[0].1.contains("undefined"));

    Ok(())
}

#[tokio::test]
async fn rejection_alerts_server_message() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .rejecting(422, Some("Data fora do plano ativo"));
    let (command, alert) = command(&api);

    let outcome = command
        .move_entry("e1", date!(2024 - 02 - 01), MealType::Dinner)
        .await;

    assert_eq!(outcome, Outcome::Failed("Data fora do plano ativo".to_owned()));
    assert_eq!(
        alert.shown(),
        vec![(
            "Erro ao mover refeição".to_owned(),
            "Data fora do plano ativo".to_owned()
        )]
    );

    Ok(())
}

#[tokio::test]
async fn missing_plan_aborts_before_any_call() -> anyhow::Result<()> {
    let api = FakeApi::default();
    let (command, alert) = command(&api);

    let outcome = command.add(None, add_input(2)).await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(api.total_calls(), 0);
    assert_eq!(alert.shown().len(), 1);
    assert_eq!(alert.shown()[0].0, "Erro ao adicionar receita");

    Ok(())
}

#[tokio::test]
async fn add_attaches_entry_to_active_plan() -> anyhow::Result<()> {
    let api = FakeApi::default();
    let (command, alert) = command(&api);
    let plan = plan(date!(2024 - 01 - 01), date!(2024 - 01 - 07));

    let created = command
        .add(Some(&plan), add_input(3))
        .await
        .applied()
        .expect("entry created");

    assert_eq!(created.meal_plan_id.as_deref(), Some("plan-1"));
    assert_eq!(created.recipe_id, "feijoada");
    assert_eq!(created.servings, 3);
    assert_eq!(api.calls("create_entry"), 1);
    assert!(alert.shown().is_empty());

    Ok(())
}

#[tokio::test]
async fn zero_servings_never_reach_the_api() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)]);
    let (command, alert) = command(&api);
    let plan = plan(date!(2024 - 01 - 01), date!(2024 - 01 - 07));

    assert!(matches!(
        command.add(Some(&plan), add_input(0)).await,
        Outcome::Failed(_)
    ));
    assert!(matches!(
        command.update_servings("e1", 0).await,
        Outcome::Failed(_)
    ));

    assert_eq!(api.total_calls(), 0);
    assert_eq!(alert.shown().len(), 2);

    Ok(())
}

#[tokio::test]
async fn servings_step_up_and_down_but_not_below_one() -> anyhow::Result<()> {
    let mut single = entry("e2", date!(2024 - 01 - 04), MealType::Dinner);
    single.servings = 1;
    let api = FakeApi::default().with_entries(vec![
        entry("e1", date!(2024 - 01 - 03), MealType::Lunch),
        single.clone(),
    ]);
    let (command, _) = command(&api);
    let e1 = api.entries()[0].clone();

    let up = command.increment_servings(&e1).await.applied();
    assert_eq!(up.map(|e| e.servings), Some(3));

    let down = command.decrement_servings(&e1).await.applied();
    assert_eq!(down.map(|e| e.servings), Some(1));

    let calls = api.calls("update_entry");
    let unchanged = command.decrement_servings(&single).await;
    assert_eq!(unchanged, Outcome::Applied(single));
    assert_eq!(api.calls("update_entry"), calls);

    Ok(())
}

#[tokio::test]
async fn overlapping_updates_keep_only_the_latest() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .delay_updates(&[80, 0]);
    let (command, alert) = command(&api);

    let (first, second) = tokio::join!(
        command.update_servings("e1", 3),
        command.update_servings("e1", 4)
    );

    assert_eq!(first, Outcome::Superseded);
    assert_eq!(second.applied().map(|e| e.servings), Some(4));
    assert_eq!(api.calls("update_entry"), 2);
    assert!(alert.shown().is_empty());
    assert_eq!(command.generations().pending(), 0);

    // Requests are not cancelled, the server keeps the last write it received.
    assert_eq!(api.entries()[0].servings, 3);

    Ok(())
}

#[tokio::test]
async fn completion_failure_is_alerted_despite_servings_change() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .rejecting_completion(409, "Refeição bloqueada")
        .delay_updates(&[80, 0]);
    let (command, alert) = command(&api);

    let (completed, servings) = tokio::join!(
        command.mark_completed("e1", true),
        command.update_servings("e1", 3)
    );

    assert_eq!(completed, Outcome::Failed("Refeição bloqueada".to_owned()));
    assert_eq!(servings.applied().map(|e| e.servings), Some(3));

    let shown = alert.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].1, "Refeição bloqueada");
    assert!(!api.entries()[0].completed);
    assert_eq!(command.generations().pending(), 0);

    Ok(())
}

#[tokio::test]
async fn delete_is_not_superseded_by_move() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .delay_deletes(80);
    let (command, alert) = command(&api);

    let (deleted, moved) = tokio::join!(
        command.delete("e1"),
        command.move_entry("e1", date!(2024 - 01 - 04), MealType::Dinner)
    );

    assert_eq!(deleted, Outcome::Applied(()));
    assert_eq!(moved.applied().map(|e| e.meal_type), Some(MealType::Dinner));
    assert!(api.entries().is_empty());
    assert!(alert.shown().is_empty());

    Ok(())
}

#[tokio::test]
async fn overlapping_deletes_report_only_the_latest() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .delay_deletes(20);
    let (command, _) = command(&api);

    let first = command.delete("e1");
    let second = async {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        command.delete("e1").await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, Outcome::Superseded);
    assert_eq!(second, Outcome::Applied(()));
    assert_eq!(api.calls("delete_entry"), 2);

    Ok(())
}

#[tokio::test]
async fn stale_failure_is_not_alerted() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)])
        .rejecting(500, None)
        .delay_updates(&[50, 0]);
    let (command, alert) = command(&api);

    let (first, second) = tokio::join!(
        command.mark_completed("e1", true),
        command.mark_completed("e1", false)
    );

    assert_eq!(first, Outcome::Superseded);
    assert!(matches!(second, Outcome::Failed(_)));
    assert_eq!(alert.shown().len(), 1);

    Ok(())
}

#[tokio::test]
async fn toggle_flips_completion() -> anyhow::Result<()> {
    let api = FakeApi::default()
        .with_entries(vec![entry("e1", date!(2024 - 01 - 03), MealType::Lunch)]);
    let (command, _) = command(&api);

    let e1 = api.entries()[0].clone();
    let toggled = command.toggle_completed(&e1).await.applied();

    assert_eq!(toggled.map(|e| e.completed), Some(true));
    assert!(api.entries()[0].completed);

    Ok(())
}

#[tokio::test]
async fn generate_and_copy_validate_their_input() -> anyhow::Result<()> {
    let api = FakeApi::default();
    let (command, alert) = command(&api);

    let reversed = GenerateRequest {
        user_id: USER_ID.to_owned(),
        start_date: date!(2024 - 01 - 07),
        end_date: date!(2024 - 01 - 01),
        meal_types: vec![],
        servings: 2,
    };
    assert!(matches!(command.generate(&reversed).await, Outcome::Failed(_)));

    let copy = CopyWeekRequest {
        user_id: String::new(),
        source_week_start: date!(2024 - 01 - 01),
        target_week_start: date!(2024 - 01 - 08),
    };
    assert!(matches!(command.copy_week(&copy).await, Outcome::Failed(_)));
    assert_eq!(api.total_calls(), 0);
    assert_eq!(alert.shown().len(), 2);

    let generated = command
        .generate(&GenerateRequest {
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 01 - 07),
            ..reversed
        })
        .await
        .applied()
        .unwrap_or_default();
    assert_eq!(generated.len(), 7);

    Ok(())
}

#[tokio::test]
async fn invalid_preferences_are_not_saved() -> anyhow::Result<()> {
    let api = FakeApi::default();
    let (command, alert) = command(&api);

    let preferences = MealPlanPreferences {
        max_prep_time_minutes: Some(2),
        ..Default::default()
    };

    let outcome = command.save_preferences(USER_ID, &preferences).await;

    assert_eq!(
        outcome,
        Outcome::Failed("Verifique as preferências informadas.".to_owned())
    );
    assert_eq!(api.calls("save_preferences"), 0);
    assert_eq!(alert.shown()[0].0, "Erro ao salvar preferências");

    let saved = command
        .save_preferences(
            USER_ID,
            &MealPlanPreferences {
                max_prep_time_minutes: Some(45),
                ..preferences
            },
        )
        .await;
    assert!(saved.is_applied());

    Ok(())
}

#[tokio::test]
async fn alerts_follow_locale() -> anyhow::Result<()> {
    let api = FakeApi::default().rejecting(500, None);
    let alert = RecordingAlert::default();
    let command = Command::new(api, alert.clone()).with_locale("en");

    command.delete("e1").await;

    assert_eq!(
        alert.shown(),
        vec![(
            "Could not remove meal".to_owned(),
            "The operation could not be completed. Please try again.".to_owned()
        )]
    );

    Ok(())
}
