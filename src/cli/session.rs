use cardapio::App;
use cardapio_shared::user::Session;

pub async fn login(app: App, user_id: String, token: Option<String>) -> anyhow::Result<()> {
    app.sessions.save(&Session { user_id, token }).await?;

    tracing::info!("session saved");

    Ok(())
}

pub async fn logout(app: App) -> anyhow::Result<()> {
    if !app.sessions.clear().await? {
        tracing::warn!("no session to clear");
    }

    Ok(())
}
