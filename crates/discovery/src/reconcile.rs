use {
    anyhow::{Context, Result},
    tracing::{debug, info},
};

use {
    groupcast_channels::{ChatSession, is_group_id},
    groupcast_ledger::{GroupRecord, LedgerStore},
};

/// Display name used when a group has none.
const UNNAMED: &str = "Unnamed";

/// Enumerate the session's group conversations, in list order.
///
/// Conversations are kept only when their identifier carries the group
/// suffix; anything malformed is excluded structurally. Each kept group gets
/// a detail fetch for its display name; a missing name becomes `"Unnamed"`,
/// never a failure.
pub async fn discover_groups(session: &dyn ChatSession) -> Result<Vec<GroupRecord>> {
    let chats = session
        .list_conversations()
        .await
        .context("listing conversations")?;
    info!(total = chats.len(), "fetched conversation list");

    let mut groups = Vec::new();
    for chat in chats.iter().filter(|c| is_group_id(&c.id)) {
        let details = session
            .conversation_details(&chat.id)
            .await
            .with_context(|| format!("fetching details for {}", chat.id))?;
        let name = details.name.unwrap_or_else(|| UNNAMED.to_string());
        debug!(group = %name, id = %details.id, "discovered group");
        groups.push(GroupRecord {
            name,
            id: details.id,
        });
    }

    info!(groups = groups.len(), "group discovery complete");
    Ok(groups)
}

/// Reconcile discovered groups into the ledger.
///
/// Loads the ledger's identifier set once, appends the groups not yet
/// recorded as a single batch in discovery order, and returns the appended
/// count. An empty diff writes nothing.
pub async fn reconcile(session: &dyn ChatSession, ledger: &dyn LedgerStore) -> Result<usize> {
    let discovered = discover_groups(session).await?;
    let existing = ledger
        .load_existing_ids()
        .await
        .context("loading existing ledger ids")?;

    let new_records: Vec<GroupRecord> = discovered
        .into_iter()
        .filter(|g| !existing.contains(&g.id))
        .collect();

    if new_records.is_empty() {
        info!("no new group IDs to add");
        return Ok(0);
    }

    let count = new_records.len();
    ledger
        .append_rows(&new_records)
        .await
        .context("appending ledger rows")?;
    info!(appended = count, "ledger update complete");
    Ok(count)
}
