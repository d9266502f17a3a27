//! Application command handlers.

use std::path::Path;

use ttn_handler_api::{
    Application, ApplicationClient, ApplicationField, ApplicationUpdate, PayloadFormat,
    PayloadFunctions,
};

use crate::cli::{
    AppArgs, AppCommand, FunctionsCommand, FunctionsSetArgs, GlobalOpts, PayloadFormatArg,
    PayloadFormatCommand, PayloadFunctionArg,
};
use crate::error::CliError;
use crate::output::{self, DetailRow, preview};

use super::{Context, util};

impl From<PayloadFormatArg> for PayloadFormat {
    fn from(arg: PayloadFormatArg) -> Self {
        match arg {
            PayloadFormatArg::Custom => Self::Custom,
            PayloadFormatArg::Cayenne => Self::Cayenne,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn detail(a: &Application) -> Vec<DetailRow> {
    vec![
        DetailRow::new("App ID", a.app_id.clone()),
        DetailRow::new("Payload Format", a.payload_format.to_string()),
        DetailRow::new("Decoder", preview(a.decoder.as_deref())),
        DetailRow::new("Converter", preview(a.converter.as_deref())),
        DetailRow::new("Validator", preview(a.validator.as_deref())),
        DetailRow::new("Encoder", preview(a.encoder.as_deref())),
        DetailRow::new(
            "Register-On-Join Key",
            if a.register_on_join_access_key.is_some() {
                "****"
            } else {
                "-"
            },
        ),
    ]
}

fn functions_detail(f: &PayloadFunctions) -> Vec<DetailRow> {
    vec![
        DetailRow::new("Decoder", preview(f.decoder.as_deref())),
        DetailRow::new("Converter", preview(f.converter.as_deref())),
        DetailRow::new("Validator", preview(f.validator.as_deref())),
        DetailRow::new("Encoder", preview(f.encoder.as_deref())),
    ]
}

/// Full function bodies, separated by `// --- <name> ---` markers.
fn functions_plain(f: &PayloadFunctions) -> String {
    [
        ("decoder", &f.decoder),
        ("converter", &f.converter),
        ("validator", &f.validator),
        ("encoder", &f.encoder),
    ]
    .into_iter()
    .filter_map(|(name, body)| {
        body.as_ref()
            .map(|body| format!("// --- {name} ---\n{body}"))
    })
    .collect::<Vec<_>>()
    .join("\n")
}

// ── Update building ─────────────────────────────────────────────────

fn read_function(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("cannot read function source: {e}"),
    })
}

/// Translate `functions set` flags into a partial update.
///
/// Only functions named on the command line are sent; `--clear` sends an
/// empty body.
fn functions_update(args: &FunctionsSetArgs) -> Result<ApplicationUpdate, CliError> {
    let mut update = ApplicationUpdate::new();

    let files = [
        (PayloadFunctionArg::Decoder, &args.decoder),
        (PayloadFunctionArg::Converter, &args.converter),
        (PayloadFunctionArg::Validator, &args.validator),
        (PayloadFunctionArg::Encoder, &args.encoder),
    ];
    for (function, path) in files {
        let source = match path {
            Some(path) => {
                if args.clear.contains(&function) {
                    return Err(CliError::Validation {
                        field: format!("{function:?}").to_lowercase(),
                        reason: "cannot both upload and clear the same function".into(),
                    });
                }
                read_function(path)?
            }
            None if args.clear.contains(&function) => String::new(),
            None => continue,
        };
        update = update.with(field(function, source));
    }

    if update.is_empty() {
        return Err(CliError::Validation {
            field: "functions".into(),
            reason: "pass at least one of --decoder, --converter, --validator, --encoder or --clear"
                .into(),
        });
    }
    Ok(update)
}

fn field(function: PayloadFunctionArg, source: String) -> ApplicationField {
    match function {
        PayloadFunctionArg::Decoder => ApplicationField::Decoder(source),
        PayloadFunctionArg::Converter => ApplicationField::Converter(source),
        PayloadFunctionArg::Validator => ApplicationField::Validator(source),
        PayloadFunctionArg::Encoder => ApplicationField::Encoder(source),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApplicationClient,
    args: AppArgs,
    global: &GlobalOpts,
    ctx: &Context,
) -> Result<(), CliError> {
    match args.command {
        AppCommand::Get => {
            let app = client.get().await.map_err(|e| ctx.api_error(e))?;
            let out = output::render_single(&global.output, &app, detail, |a| a.app_id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AppCommand::PayloadFormat(pf) => match pf.command.unwrap_or(PayloadFormatCommand::Get) {
            PayloadFormatCommand::Get => {
                let format = client
                    .payload_format()
                    .await
                    .map_err(|e| ctx.api_error(e))?;
                let out = output::render_single(
                    &global.output,
                    &format,
                    |f| vec![DetailRow::new("Payload Format", f.to_string())],
                    ToString::to_string,
                );
                output::print_output(&out, global.quiet);
                Ok(())
            }
            PayloadFormatCommand::Set { format } => {
                let format = PayloadFormat::from(format);
                client
                    .set_payload_format(format)
                    .await
                    .map_err(|e| ctx.api_error(e))?;
                if !global.quiet {
                    eprintln!("✓ Payload format of '{}' set to {format}", client.app_id());
                }
                Ok(())
            }
        },

        AppCommand::Functions(fa) => match fa.command.unwrap_or(FunctionsCommand::Get) {
            FunctionsCommand::Get => {
                let functions = client
                    .custom_payload_functions()
                    .await
                    .map_err(|e| ctx.api_error(e))?;
                let out = output::render_single(
                    &global.output,
                    &functions,
                    functions_detail,
                    functions_plain,
                );
                output::print_output(&out, global.quiet);
                Ok(())
            }
            FunctionsCommand::Set(set) => {
                let update = functions_update(&set)?;
                let names = update.field_names().join(", ");
                client.set(update).await.map_err(|e| ctx.api_error(e))?;
                if !global.quiet {
                    eprintln!("✓ Updated {names} of '{}'", client.app_id());
                }
                Ok(())
            }
        },

        AppCommand::Delete => {
            let prompt = format!(
                "Delete application '{}' from the handler?",
                client.app_id()
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            client.delete().await.map_err(|e| ctx.api_error(e))?;
            if !global.quiet {
                eprintln!("✓ Application '{}' deleted", client.app_id());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn set_args() -> FunctionsSetArgs {
        FunctionsSetArgs {
            decoder: None,
            converter: None,
            validator: None,
            encoder: None,
            clear: Vec::new(),
        }
    }

    #[test]
    fn functions_update_reads_only_given_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"function Decoder(b) { return {}; }").unwrap();

        let args = FunctionsSetArgs {
            decoder: Some(file.path().to_path_buf()),
            ..set_args()
        };
        let update = functions_update(&args).unwrap();

        assert_eq!(update.field_names(), vec!["decoder"]);
        assert_eq!(
            update.fields(),
            &[ApplicationField::Decoder(
                "function Decoder(b) { return {}; }".into()
            )]
        );
    }

    #[test]
    fn clear_sends_empty_body() {
        let args = FunctionsSetArgs {
            clear: vec![PayloadFunctionArg::Validator],
            ..set_args()
        };
        let update = functions_update(&args).unwrap();

        assert_eq!(
            update.fields(),
            &[ApplicationField::Validator(String::new())]
        );
    }

    #[test]
    fn empty_functions_update_is_rejected() {
        let result = functions_update(&set_args());
        assert!(matches!(result, Err(CliError::Validation { .. })));
    }

    #[test]
    fn upload_and_clear_of_same_function_conflict() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = FunctionsSetArgs {
            encoder: Some(file.path().to_path_buf()),
            clear: vec![PayloadFunctionArg::Encoder],
            ..set_args()
        };
        assert!(matches!(
            functions_update(&args),
            Err(CliError::Validation { ref field, .. }) if field == "encoder"
        ));
    }

    #[test]
    fn plain_functions_skip_unset_bodies() {
        let functions = PayloadFunctions {
            decoder: Some("return {};".into()),
            encoder: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            functions_plain(&functions),
            "// --- decoder ---\nreturn {};\n// --- encoder ---\n"
        );
    }
}
