use anyhow::Result;

use harvest_core::HarvestConfig;

use super::print_json;

pub fn run(config: &HarvestConfig) -> Result<()> {
    print_json(config)?;

    let key_state = if config.llm.api_key().is_some() {
        "set"
    } else {
        "not set"
    };
    eprintln!("LLM API key ({}): {key_state}", config.llm.api_key_env);

    Ok(())
}
