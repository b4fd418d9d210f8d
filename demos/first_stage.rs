//! Builds a small scene, reopens it and edits it.
//!
//! Run with `cargo run --example first_stage [path]`. Set `RUST_LOG=debug` to see what the stage does.

use openusd_stage::{
	Result, gf, sdf,
	usd::Stage,
	usd_geom::{Cube, Scope, Xform, XformCommonApi},
	usd_lux::{DistantLight, DomeLight},
	vt,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_default(location: &Path) -> Result<()> {
	let stage = Stage::create_new(location)?;

	let geom_scope = Scope::define(&stage, &sdf::Path::parse("/Geometry")?)?;
	let xform = Xform::define(&stage, &geom_scope.path().append_child("GroupTransform")?)?;
	Cube::define(&stage, &xform.path().append_child("Box")?)?;

	let light_scope = Scope::define(&stage, &sdf::Path::parse("/Lights")?)?;
	DomeLight::define(&stage, &light_scope.path().append_child("DomeLight")?)?;
	DistantLight::define(&stage, &light_scope.path().append_child("Sun")?)?;

	stage.save()?;
	println!("Stage created: {}", stage.export_to_string()?);
	Ok(())
}

fn traverse_all_paths(stage: &Stage) -> Result<()> {
	for prim in stage.traverse()? {
		println!("{}", prim.path());
	}
	Ok(())
}

fn list_cube_attrs(cube: &Cube) {
	for name in cube.schema_attribute_names() {
		println!("{}", name);
	}
}

fn change_cube_color(cube: &Cube) -> Result<()> {
	cube.display_color_attr()?
		.set(vec![gf::Vec3f::new(1.0, 0.0, 0.0)])
}

fn change_cube_size(cube: &Cube) -> Result<()> {
	let size = cube.size_attr()?;
	size.set(size.get::<f64>()? * 2.0)
}

fn add_child_to_prim(stage: &Stage) -> Result<()> {
	let group_path = sdf::Path::parse("/Geometry/GroupTransform")?;
	let Some(group) = stage.prim_at_path(&group_path)? else {
		return Ok(());
	};
	let small_box = Cube::define(stage, &group.path().append_child("Small_Box")?)?;
	XformCommonApi::new(small_box.into_prim()).set_translate(gf::Vec3d::new(4.0, 5.0, 4.0))
}

fn check_prim_exists(stage: &Stage) -> Result<()> {
	let geometry = stage.prim_at_path(&sdf::Path::parse("/Geometry")?)?;
	// Only direct children are looked at, so the nested Box is not found.
	match geometry.and_then(|prim| prim.child("Box")) {
		Some(_) => println!("Box child prim exists"),
		None => println!("Child prim Box DOES NOT EXIST"),
	}
	Ok(())
}

fn print_box(stage: &Stage) -> Result<()> {
	let Some(cube) = Cube::get(stage, &sdf::Path::parse("/Geometry/GroupTransform/Box")?)? else {
		return Ok(());
	};
	let color = cube.display_color_attr()?.get::<vt::Array<gf::Vec3f>>()?;
	let size = cube.size_attr()?.get::<f64>()?;
	println!("Box: size {} color {:?}", size, color);
	Ok(())
}

fn main() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("openusd_stage=info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let location = std::env::args()
		.nth(1)
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from("assets/first_stage.usda"));

	if !location.exists() {
		init_default(&location)?;
	}

	let stage = Stage::open(&location)?;

	let box_path = sdf::Path::parse("/Geometry/GroupTransform/Box")?;
	let Some(cube) = stage.prim_at_path(&box_path)?.and_then(Cube::new) else {
		eprintln!("{} has no Cube at {}", location.display(), box_path);
		return Ok(());
	};

	list_cube_attrs(&cube);
	change_cube_color(&cube)?;
	change_cube_size(&cube)?;
	add_child_to_prim(&stage)?;
	traverse_all_paths(&stage)?;
	check_prim_exists(&stage)?;
	print_box(&stage)?;

	stage.save()?;
	println!("Saved {:?} stage to {}", stage.state(), location.display());
	Ok(())
}
