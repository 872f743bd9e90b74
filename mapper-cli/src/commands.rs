use colored::Colorize;

use uuid_mapper_core::{MapperError, UuidMapper};

use crate::cli::{Command, Target};

/// A single store operation with its arguments already parsed and trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Add { name: String, uuid: Option<String> },
    Get { uuid: String },
    Find { name: String },
    EditByUuid { uuid: String, new_name: String },
    EditByName { old_name: String, new_name: String },
    DeleteByUuid { uuid: String },
    DeleteByName { name: String },
    ResetUuid { name: String },
}

impl Request {
    /// Converts a one-shot subcommand into a request
    ///
    /// Returns `None` for `shell`, which is not a store operation.
    pub fn from_command(command: Command) -> Option<Self> {
        let request = match command {
            Command::List => Request::List,
            Command::Add { name, uuid } => Request::Add {
                name: name.trim().to_string(),
                uuid: blank_to_none(uuid),
            },
            Command::Get { uuid } => Request::Get {
                uuid: uuid.trim().to_string(),
            },
            Command::Find { name } => Request::Find {
                name: name.trim().to_string(),
            },
            Command::Edit { target, new_name } => {
                let new_name = new_name.trim().to_string();
                match target {
                    Target {
                        uuid: Some(uuid), ..
                    } => Request::EditByUuid {
                        uuid: uuid.trim().to_string(),
                        new_name,
                    },
                    Target { name, .. } => Request::EditByName {
                        old_name: name.unwrap_or_default().trim().to_string(),
                        new_name,
                    },
                }
            }
            Command::Delete { target } => match target {
                Target {
                    uuid: Some(uuid), ..
                } => Request::DeleteByUuid {
                    uuid: uuid.trim().to_string(),
                },
                Target { name, .. } => Request::DeleteByName {
                    name: name.unwrap_or_default().trim().to_string(),
                },
            },
            Command::Reset { name } => Request::ResetUuid {
                name: name.trim().to_string(),
            },
            Command::Shell => return None,
        };
        Some(request)
    }
}

/// Treats a missing or blank value as absent
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Runs a request against the store and prints its outcome
pub fn execute(mapper: &mut UuidMapper, request: Request) -> Result<(), MapperError> {
    match request {
        Request::List => {
            if mapper.is_empty() {
                println!("No mappings available.");
            } else {
                for entry in mapper.list() {
                    println!("{}", entry);
                }
            }
        }
        Request::Add { name, uuid } => {
            let uuid = mapper.add(&name, uuid.as_deref())?;
            println!("{}", format!("Added: {} -> {}", uuid, name).green());
        }
        Request::Get { uuid } => {
            let name = mapper.get(&uuid)?;
            println!("{}", name);
        }
        Request::Find { name } => {
            let entry = mapper.find_by_name(&name)?;
            println!("{}", entry);
        }
        Request::EditByUuid { uuid, new_name } => {
            mapper.edit_by_uuid(&uuid, &new_name)?;
            println!("{}", format!("Updated {} -> {}", uuid, new_name).green());
        }
        Request::EditByName { old_name, new_name } => {
            let uuid = mapper.edit_by_name(&old_name, &new_name)?;
            println!("{}", format!("Updated {} -> {}", uuid, new_name).green());
        }
        Request::DeleteByUuid { uuid } => {
            let removed = mapper.delete_by_uuid(&uuid)?;
            println!("{}", format!("Deleted {}", removed).green());
        }
        Request::DeleteByName { name } => {
            let removed = mapper.delete_by_name(&name)?;
            println!("{}", format!("Deleted {}", removed).green());
        }
        Request::ResetUuid { name } => {
            let uuid = mapper.reset_uuid(&name)?;
            println!("{}", format!("Reset UUID: {} -> {}", uuid, name).green());
        }
    }

    Ok(())
}

/// Prints an error from a store operation
///
/// Not-found errors get the short user-facing message; everything else is
/// printed in full on stderr.
pub fn report_error(err: &MapperError) {
    match err.not_found_kind() {
        Some(kind) => println!("{}", format!("{} not found", kind).yellow()),
        None => eprintln!("{} {}", "Error:".red().bold(), err),
    }
}
