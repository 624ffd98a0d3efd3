#![allow(dead_code)]

use chrono::NaiveDate;

use painel::models::meeting::RawMeeting;
use painel::models::{ActionItem, Status, Territory};
use painel::views::AppState;

/// Four meetings across three territories.
///
/// - action 100 appears twice (Centro in January, Norte in March)
/// - "Saneamento básico" is discussed in Norte and Sul with different casing
/// - meeting 4 has no agenda; "Educação" has no actions
const FIXTURE: &str = r#"[
  {
    "id": 1, "territory": "Norte", "date": "2025-03-10", "time": "10:00",
    "facilitator": "Carla Souza",
    "agenda_items": [
      {
        "id": 10, "description": "Saneamento básico",
        "actions": [
          { "id": 100, "problem": "Esgoto a céu aberto", "description": "Mutirão de limpeza",
            "deadline": "2025-04-01", "status": "Pendente",
            "responsible": ["Ana Lima", "Bruno Reis"] },
          { "id": 101, "problem": "Coleta irregular", "solution": "Nova rota",
            "deadline": "2025-03-20", "status": "Concluído",
            "responsible": ["Ana Lima"] }
        ]
      },
      {
        "id": 11, "description": "Iluminação pública",
        "actions": [
          { "id": 102, "problem": "Postes apagados", "status": "Em andamento", "responsible": [] }
        ]
      }
    ]
  },
  {
    "id": 2, "territory": "Sul", "date": "2025-02-05", "time": null, "facilitator": null,
    "agenda_items": [
      {
        "id": 20, "description": "saneamento básico ",
        "actions": [
          { "id": 103, "problem": "Falta de água", "deadline": "2025-02-28",
            "status": "concluída", "responsible": ["Diego"] }
        ]
      },
      { "id": 21, "description": "Educação", "actions": [] }
    ]
  },
  {
    "id": 3, "territory": "Centro", "date": "2025-01-15", "facilitator": "Eva",
    "agenda_items": [
      {
        "id": 30, "description": "Saúde",
        "actions": [
          { "id": 100, "problem": "Esgoto a céu aberto", "status": "Pendente",
            "responsible": ["Ana Lima"] },
          { "id": 104, "problem": "Fila no posto", "deadline": "2025-01-30",
            "status": "EM ANDAMENTO", "responsible": ["Eva"] }
        ]
      }
    ]
  },
  { "id": 4, "territory": "Norte", "date": "2025-01-20", "agenda_items": [] }
]"#;

pub fn raw_tree() -> Vec<RawMeeting> {
    serde_json::from_str(FIXTURE).expect("fixture parses")
}

pub fn territories() -> Vec<Territory> {
    ["Centro", "Leste", "Norte", "Sul"]
        .iter()
        .enumerate()
        .map(|(i, name)| Territory { id: (i + 1).to_string(), name: name.to_string() })
        .collect()
}

/// App state with all three views `Ready` from the fixture.
pub fn state() -> AppState {
    AppState::from_snapshot(&raw_tree(), territories())
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn action(id: &str, territory: &str, meeting_date: &str, status: Status) -> ActionItem {
    ActionItem {
        id: id.to_string(),
        meeting_date: date(meeting_date),
        agenda_item_description: "Pauta".to_string(),
        problem: format!("Problema {id}"),
        description: String::new(),
        solution: String::new(),
        responsible_parties: "Sem responsável".to_string(),
        territory: territory.to_string(),
        deadline: None,
        status,
    }
}
