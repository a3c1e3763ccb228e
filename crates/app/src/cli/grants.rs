use clap::Args;
use reservations_app::{
    context::AppContext,
    domain::{
        accounts::records::AccountId,
        entities::{EntityKind, ResourceRef},
    },
};

use super::CommandError;

#[derive(Debug, Args)]
pub(crate) struct CanWriteArgs {
    /// Account identifier
    #[arg(long)]
    account: i64,

    /// Entity type tag of the resource
    #[arg(long)]
    type_tag: EntityKind,

    /// Resource identifier
    #[arg(long)]
    id: i64,
}

#[derive(Debug, Args)]
pub(crate) struct GrantArgs {
    /// Account identifier
    #[arg(long)]
    account: i64,

    /// Entity type tag of the resource
    #[arg(long)]
    type_tag: EntityKind,

    /// Resource identifier
    #[arg(long)]
    id: i64,
}

pub(crate) async fn can_write(context: &AppContext, args: CanWriteArgs) -> Result<(), CommandError> {
    let account = AccountId::from_i64(args.account);
    let resource = ResourceRef::new(args.type_tag, args.id);

    let capabilities = context
        .permissions
        .capabilities(account, resource)
        .await
        .map_err(|error| {
            CommandError::from_service("check permissions", error.is_client_error(), &error)
        })?;

    println!("resource: {resource}");
    println!("can_view: {}", capabilities.view);
    println!("can_change: {}", capabilities.change);
    println!("can_delete: {}", capabilities.delete);

    Ok(())
}

pub(crate) async fn grant(context: &AppContext, args: GrantArgs) -> Result<(), CommandError> {
    let account = AccountId::from_i64(args.account);
    let resource = ResourceRef::new(args.type_tag, args.id);

    let grant = context
        .permissions
        .set_can_write(account, resource)
        .await
        .map_err(|error| {
            CommandError::from_service("grant write access", error.is_client_error(), &error)
        })?;

    println!("grant_id: {}", grant.id);
    println!("account_id: {}", grant.account);
    println!("resource: {}", grant.resource);
    println!("is_owner: {}", grant.is_owner);

    Ok(())
}
