use clap::Args;
use reservations_app::{
    context::AppContext,
    domain::{entities::EntityKind, tombstones::records::RestoredEntity},
};

use super::CommandError;

#[derive(Debug, Args)]
pub(crate) struct RestoreArgs {
    /// Entity type tag, e.g. `reservations.reservation`
    #[arg(long)]
    type_tag: EntityKind,

    /// Identifier the entity had before deletion
    #[arg(long)]
    id: i64,
}

#[derive(Debug, Args)]
pub(crate) struct ListTombstonesArgs {
    /// Entity type tag, e.g. `catalog.resource`
    #[arg(long)]
    type_tag: EntityKind,
}

pub(crate) async fn restore(context: &AppContext, args: RestoreArgs) -> Result<(), CommandError> {
    let restored = context
        .tombstones
        .restore(args.type_tag, args.id)
        .await
        .map_err(|error| CommandError::from_service("restore", error.is_client_error(), &error))?;

    println!("restored: {} #{}", restored.kind(), restored.entity_id());

    match restored {
        RestoredEntity::Reservation(reservation) => {
            println!("holder_name: {}", reservation.holder_name);
            println!("start_date: {}", reservation.start_date);
            println!(
                "resource_id: {}",
                reservation
                    .resource_id
                    .map_or_else(|| "none".to_string(), |id| id.to_string())
            );
        }
        RestoredEntity::Resource(resource) => {
            println!("name: {}", resource.name);
            println!("category: {}", resource.category);
        }
    }

    Ok(())
}

pub(crate) async fn list(
    context: &AppContext,
    args: ListTombstonesArgs,
) -> Result<(), CommandError> {
    let tombstones = context
        .tombstones
        .list_tombstones(args.type_tag)
        .await
        .map_err(|error| {
            CommandError::from_service("list tombstones", error.is_client_error(), &error)
        })?;

    if tombstones.is_empty() {
        println!("no tombstones found for {}", args.type_tag);
        return Ok(());
    }

    for tombstone in tombstones {
        println!("tombstone_id: {}", tombstone.id);
        println!("entity_id: {}", tombstone.entity_id);
        println!("deleted_at: {}", tombstone.deleted_at);
        println!("snapshot_version: {}", tombstone.payload.version);
        println!();
    }

    Ok(())
}
