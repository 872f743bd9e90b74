use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::commands::{blank_to_none, Request};

/// Entries of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Add,
    EditByUuid,
    EditByName,
    DeleteByUuid,
    DeleteByName,
    ResetUuid,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 8] = [
        MenuAction::List,
        MenuAction::Add,
        MenuAction::EditByUuid,
        MenuAction::EditByName,
        MenuAction::DeleteByUuid,
        MenuAction::DeleteByName,
        MenuAction::ResetUuid,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::List => write!(f, "List mappings"),
            MenuAction::Add => write!(f, "Add mapping"),
            MenuAction::EditByUuid => write!(f, "Edit by UUID"),
            MenuAction::EditByName => write!(f, "Edit by Name"),
            MenuAction::DeleteByUuid => write!(f, "Delete by UUID"),
            MenuAction::DeleteByName => write!(f, "Delete by Name"),
            MenuAction::ResetUuid => write!(f, "Reset UUID for Name"),
            MenuAction::Exit => write!(f, "Exit"),
        }
    }
}

/// Prompts the user to pick a menu entry
pub fn prompt_menu_action() -> Result<MenuAction, InquireError> {
    Select::new("Select an option:", MenuAction::ALL.to_vec())
        .with_page_size(MenuAction::ALL.len())
        .prompt()
}

/// Prompts for a line of text, trimmed
fn prompt_text(message: &str) -> Result<String, InquireError> {
    Text::new(message).prompt().map(|s| s.trim().to_string())
}

/// Gathers the arguments for a menu entry
///
/// Returns `None` for [`MenuAction::Exit`].
pub fn prompt_request(action: MenuAction) -> Result<Option<Request>, InquireError> {
    let request = match action {
        MenuAction::List => Request::List,
        MenuAction::Add => {
            let name = prompt_text("Enter script name:")?;
            let uuid = Text::new("Enter UUID (leave blank for auto):").prompt()?;
            Request::Add {
                name,
                uuid: blank_to_none(Some(uuid)),
            }
        }
        MenuAction::EditByUuid => {
            let uuid = prompt_text("Enter UUID to edit:")?;
            let new_name = prompt_text("Enter new name:")?;
            Request::EditByUuid { uuid, new_name }
        }
        MenuAction::EditByName => {
            let old_name = prompt_text("Enter current name:")?;
            let new_name = prompt_text("Enter new name:")?;
            Request::EditByName { old_name, new_name }
        }
        MenuAction::DeleteByUuid => Request::DeleteByUuid {
            uuid: prompt_text("Enter UUID to delete:")?,
        },
        MenuAction::DeleteByName => Request::DeleteByName {
            name: prompt_text("Enter name to delete:")?,
        },
        MenuAction::ResetUuid => Request::ResetUuid {
            name: prompt_text("Enter name to reset UUID:")?,
        },
        MenuAction::Exit => return Ok(None),
    };

    Ok(Some(request))
}
