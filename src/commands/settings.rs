// ABOUTME: Settings commands for the Sakila Charts CLI
// ABOUTME: Shows where the config lives and what it resolves to, without secrets

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::Context;
use crate::config::{DatabaseType, Preferences, RendererKind};

/// Public connection profile (without password)
#[derive(Serialize)]
pub struct ConnectionProfilePublic {
    pub name: String,
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub database: String,
    pub trust_certificate: bool,
    pub has_password: bool,
}

#[derive(Serialize)]
struct EffectiveSettings<'a> {
    config_path: &'a PathBuf,
    active_profile: &'a str,
    profile: ConnectionProfilePublic,
    renderer: RendererKind,
    output_dir: &'a PathBuf,
    preferences: &'a Preferences,
}

pub fn show(ctx: &Context) -> Result<()> {
    let p = &ctx.profile;
    let settings = EffectiveSettings {
        config_path: &ctx.config_path,
        active_profile: &ctx.config.active_profile,
        profile: ConnectionProfilePublic {
            name: p.name.clone(),
            db_type: p.db_type.clone(),
            host: p.host.clone(),
            port: p.port,
            username: p.username.clone(),
            database: p.database.clone(),
            trust_certificate: p.trust_certificate,
            has_password: !p.password.is_empty(),
        },
        renderer: ctx.renderer,
        output_dir: &ctx.output_dir,
        preferences: &ctx.config.preferences,
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
