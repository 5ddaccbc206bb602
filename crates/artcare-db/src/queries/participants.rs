//! Teaching participant database queries.

use artcare_common::{CompletionStatus, ParticipantId, Result, SeniorId, TeachingRecordId};
use rusqlite::Connection;

use super::{column_as, db_err};
use crate::models::TeachingParticipant;

const SELECT_COLUMNS: &str = "SELECT id, teaching_record_id, senior_id, completion_status, \
     reaction FROM teaching_participants";

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<TeachingParticipant> {
    Ok(TeachingParticipant {
        id: column_as(row, 0)?,
        teaching_record_id: column_as(row, 1)?,
        senior_id: column_as(row, 2)?,
        completion_status: column_as(row, 3)?,
        reaction: row.get(4)?,
    })
}

/// Record that a senior took part in a teaching session.
pub fn create_participant(
    conn: &Connection,
    teaching_record_id: TeachingRecordId,
    senior_id: SeniorId,
    completion_status: CompletionStatus,
    reaction: Option<&str>,
) -> Result<TeachingParticipant> {
    let participant = TeachingParticipant {
        id: ParticipantId::new(),
        teaching_record_id,
        senior_id,
        completion_status,
        reaction: reaction.map(str::to_string),
    };
    insert_participant(conn, &participant)?;
    Ok(participant)
}

/// Insert a participant row, keeping its id.
pub fn insert_participant(conn: &Connection, participant: &TeachingParticipant) -> Result<()> {
    conn.execute(
        "INSERT INTO teaching_participants (id, teaching_record_id, senior_id,
                                            completion_status, reaction)
         VALUES (:id, :teaching_record_id, :senior_id, :completion_status, :reaction)",
        rusqlite::named_params! {
            ":id": participant.id.to_string(),
            ":teaching_record_id": participant.teaching_record_id.to_string(),
            ":senior_id": participant.senior_id.to_string(),
            ":completion_status": participant.completion_status.to_string(),
            ":reaction": &participant.reaction,
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// List all participant rows.
pub fn list_participants(conn: &Connection) -> Result<Vec<TeachingParticipant>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY teaching_record_id, id"))
        .map_err(db_err)?;

    let participants = stmt
        .query_map([], parse_participant_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(participants)
}

/// List the participants of one teaching session.
pub fn list_participants_for_record(
    conn: &Connection,
    teaching_record_id: TeachingRecordId,
) -> Result<Vec<TeachingParticipant>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE teaching_record_id = :record_id ORDER BY id"
        ))
        .map_err(db_err)?;

    let participants = stmt
        .query_map(
            rusqlite::named_params! { ":record_id": teaching_record_id.to_string() },
            parse_participant_row,
        )
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(participants)
}

/// Delete every participant row. Returns the number of rows removed.
pub fn delete_all_participants(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM teaching_participants", [])
        .map_err(db_err)
}

/// Count participant rows.
pub fn count_participants(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM teaching_participants", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(db_err)
}
