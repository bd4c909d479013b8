//! Demo: fills a component from a resources folder
//!
//! Usage: `resource_attr [ROOT_DIR | CONFIG.ron]` (default `assets/Resources`).
//! Set `RUST_LOG=debug` to watch discovery and loading.

use resource_attr::prelude::*;

/// Demo component with one member per loading mode
#[derive(Default)]
struct Tester {
    /// Everything in the resources folder
    objects: Option<Vec<UntypedHandle>>,
    prefab: Option<AssetHandle<Prefab>>,
    texture: Option<AssetHandle<Texture2D>>,
    text: Option<AssetHandle<TextAsset>>,
}

impl Tester {
    fn set_texture(&mut self, texture: Option<AssetHandle<Texture2D>>) {
        self.texture = texture;
    }
}

impl Behaviour for Tester {
    fn members() -> Vec<Member<Self>> {
        vec![
            Member::field("objects", |t: &mut Self| &mut t.objects).with(Resource::new("")),
            Member::field("prefab", |t: &mut Self| &mut t.prefab)
                .with(Resource::new("Camera Prefab")),
            Member::property("texture", Self::set_texture).with(Resource::forced("Logo")),
            Member::field("text", |t: &mut Self| &mut t.text).with(Resource::new("SomeTextDoc")),
        ]
    }
}

fn config_from_args() -> Result<ResourcesConfig, AssetError> {
    match std::env::args().nth(1) {
        Some(arg) if arg.ends_with(".ron") => ResourcesConfig::load_ron(arg),
        Some(arg) if arg.ends_with(".json") => ResourcesConfig::load_json(arg),
        Some(arg) => Ok(ResourcesConfig::default().with_root(arg)),
        None => Ok(ResourcesConfig::default()),
    }
}

fn run() -> Result<(), AssetError> {
    let config = config_from_args()?;
    let store = Resources::load_dir(&config)?;
    let cache = MemberCache::new();

    let mut tester = Tester::default();
    tester.load_resources(&cache, &store)?;

    match &tester.objects {
        Some(objects) => log::info!("objects: {} asset(s)", objects.len()),
        None => log::info!("objects: none"),
    }
    match &tester.prefab {
        Some(prefab) => log::info!(
            "prefab: {} ({} node(s)) at {}",
            prefab.name,
            prefab.node_count(),
            prefab.transform.position
        ),
        None => log::warn!("prefab: not found"),
    }
    match &tester.texture {
        Some(texture) => log::info!("texture: {}x{}", texture.width, texture.height),
        None => log::warn!("texture: not found"),
    }
    match &tester.text {
        Some(text) => log::info!("text: {:?}", text.text.trim()),
        None => log::warn!("text: not found"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Resource demo failed: {e}");
        std::process::exit(1);
    }
}
