use anyhow::Result;
use auth::MagicLinkService;
use common::ApiClient;

pub async fn login(client: ApiClient, email: &str) -> Result<()> {
    let service = MagicLinkService::new(client);
    let response = service.request_magic_link(email).await?;

    println!("Check your inbox for a sign-in link.");
    if let Some(url) = response.dev_login_url {
        println!("Development login link: {}", url);
    }
    Ok(())
}

pub async fn verify(client: ApiClient, token: &str) -> Result<()> {
    let service = MagicLinkService::new(client);
    let user = service.verify_magic_link(token).await?;

    if user.email.is_empty() {
        println!("Signed in as {}", user.id);
    } else {
        println!("Signed in as {} ({})", user.email, user.id);
    }
    Ok(())
}

pub fn logout(client: ApiClient) -> Result<()> {
    MagicLinkService::new(client).sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(client: ApiClient) -> Result<()> {
    let service = MagicLinkService::new(client);
    match service.current_user_id()? {
        Some(user_id) if service.is_authenticated() => println!("{}", user_id),
        _ => println!("Not signed in."),
    }
    Ok(())
}
