use std::collections::HashMap;

use sqlx::PgPool;

use super::types::*;

/// Meetings joined down to responsible parties, newest meeting first.
///
/// LEFT JOINs keep meetings without agenda items and actions without owners;
/// the territory join is INNER because every meeting belongs to one.
const MEETING_TREE_SELECT: &str = "\
SELECT r.id_reuniao AS meeting_id, \
       r.data AS meeting_date, \
       r.hora::TEXT AS meeting_time, \
       r.secretario_nome AS facilitator, \
       t.nome AS territory, \
       p.id_pauta AS agenda_id, \
       p.descricao AS agenda_description, \
       a.id_acao AS action_id, \
       a.problema AS problem, \
       a.descricao_acao AS action_description, \
       a.solucao AS solution, \
       a.prazo AS deadline, \
       a.status AS status, \
       ar.id_responsavel AS responsible_id, \
       resp.nome AS responsible_name \
FROM reunioes r \
JOIN territorios t ON t.id_territorio = r.id_territorio \
LEFT JOIN pautas p ON p.id_reuniao = r.id_reuniao \
LEFT JOIN acoes a ON a.id_pauta = p.id_pauta \
LEFT JOIN acao_responsavel ar ON ar.id_acao = a.id_acao \
LEFT JOIN responsaveis resp ON resp.id_responsavel = ar.id_responsavel \
ORDER BY r.data DESC, r.id_reuniao, p.id_pauta, a.id_acao, resp.nome";

/// Fetch every meeting with its agenda items, actions and responsible parties.
pub async fn fetch_tree(pool: &PgPool) -> Result<Vec<RawMeeting>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FlatRow>(MEETING_TREE_SELECT)
        .fetch_all(pool)
        .await?;
    Ok(assemble_tree(rows))
}

/// Fold flat join rows back into the nested meeting shape.
///
/// Meetings keep first-seen order. A NULL agenda or action id means the LEFT
/// JOIN found no child at that level; the parent is still emitted.
pub fn assemble_tree(rows: Vec<FlatRow>) -> Vec<RawMeeting> {
    let mut meetings: Vec<RawMeeting> = Vec::new();
    let mut meeting_idx: HashMap<i64, usize> = HashMap::new();
    let mut agenda_idx: HashMap<(i64, i64), usize> = HashMap::new();
    let mut action_idx: HashMap<(i64, i64, i64), usize> = HashMap::new();

    for row in rows {
        let mi = match meeting_idx.get(&row.meeting_id) {
            Some(&i) => i,
            None => {
                meetings.push(RawMeeting {
                    id: row.meeting_id,
                    territory: row.territory.clone(),
                    date: row.meeting_date,
                    time: row.meeting_time.clone(),
                    facilitator: row.facilitator.clone(),
                    agenda_items: Vec::new(),
                });
                meeting_idx.insert(row.meeting_id, meetings.len() - 1);
                meetings.len() - 1
            }
        };

        let Some(agenda_id) = row.agenda_id else { continue };
        let meeting = &mut meetings[mi];
        let ai = match agenda_idx.get(&(row.meeting_id, agenda_id)) {
            Some(&i) => i,
            None => {
                meeting.agenda_items.push(RawAgendaItem {
                    id: agenda_id,
                    description: row.agenda_description.clone(),
                    actions: Vec::new(),
                });
                let i = meeting.agenda_items.len() - 1;
                agenda_idx.insert((row.meeting_id, agenda_id), i);
                i
            }
        };

        let Some(action_id) = row.action_id else { continue };
        let agenda = &mut meeting.agenda_items[ai];
        let key = (row.meeting_id, agenda_id, action_id);
        let xi = match action_idx.get(&key) {
            Some(&i) => i,
            None => {
                agenda.actions.push(RawAction {
                    id: action_id,
                    problem: row.problem.clone(),
                    description: row.action_description.clone(),
                    solution: row.solution.clone(),
                    deadline: row.deadline,
                    status: row.status.clone(),
                    responsible: Vec::new(),
                });
                let i = agenda.actions.len() - 1;
                action_idx.insert(key, i);
                i
            }
        };

        if row.responsible_id.is_some() {
            agenda.actions[xi].responsible.push(row.responsible_name);
        }
    }

    meetings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(meeting_id: i64, d: &str) -> FlatRow {
        FlatRow {
            meeting_id,
            meeting_date: date(d),
            territory: Some("Centro".into()),
            ..Default::default()
        }
    }

    #[test]
    fn meeting_without_children_is_kept() {
        let tree = assemble_tree(vec![row(1, "2025-03-01")]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].agenda_items.is_empty());
    }

    #[test]
    fn responsible_rows_collapse_into_one_action() {
        let base = FlatRow {
            agenda_id: Some(10),
            agenda_description: Some("Saúde".into()),
            action_id: Some(100),
            status: Some("Pendente".into()),
            ..row(1, "2025-03-01")
        };
        let rows = vec![
            FlatRow { responsible_id: Some(1), responsible_name: Some("Ana".into()), ..base.clone() },
            FlatRow { responsible_id: Some(2), responsible_name: Some("Bruno".into()), ..base.clone() },
            FlatRow { responsible_id: Some(3), responsible_name: None, ..base },
        ];
        let tree = assemble_tree(rows);
        let actions = &tree[0].agenda_items[0].actions;
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].responsible,
            vec![Some("Ana".to_string()), Some("Bruno".to_string()), None]
        );
    }

    #[test]
    fn action_without_owner_has_no_responsible_entries() {
        let r = FlatRow { agenda_id: Some(10), action_id: Some(100), ..row(1, "2025-03-01") };
        let tree = assemble_tree(vec![r]);
        assert!(tree[0].agenda_items[0].actions[0].responsible.is_empty());
    }

    #[test]
    fn preserves_fetch_order_of_meetings() {
        let rows = vec![
            row(2, "2025-05-01"),
            FlatRow { agenda_id: Some(1), ..row(1, "2025-04-01") },
            FlatRow { agenda_id: Some(2), ..row(1, "2025-04-01") },
        ];
        let tree = assemble_tree(rows);
        assert_eq!(tree.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(tree[1].agenda_items.len(), 2);
    }

    #[test]
    fn same_action_under_two_meetings_keeps_both_paths() {
        let rows = vec![
            FlatRow { agenda_id: Some(1), action_id: Some(7), ..row(1, "2025-04-01") },
            FlatRow { agenda_id: Some(2), action_id: Some(7), ..row(2, "2025-03-01") },
        ];
        let tree = assemble_tree(rows);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].agenda_items[0].actions[0].id, 7);
        assert_eq!(tree[1].agenda_items[0].actions[0].id, 7);
    }
}
