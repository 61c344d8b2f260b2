use std::path::{Path, PathBuf};

use hp_plot::{
    InputSpec, NormalizeToUnity, Pipeline, PlotData, PlotDict, PlotError, Processor, RootInput,
    RootPlot,
};
use hp_render::config::resolve_config;
use hp_render::output::OutputFormat;
use hp_root::fixture::{FixtureHist, RootFileBuilder};

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("hp-plot-{tag}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_fixture(dir: &Path) -> PathBuf {
    let mut b = RootFileBuilder::new("histos.root");
    b.add_hist(
        "sr",
        FixtureHist::th1d("m_ll", &[60.0, 80.0, 100.0, 120.0], &[10.0, 40.0, 10.0])
            .with_sumw2(&[10.0, 40.0, 10.0]),
    );
    b.add_hist("sr", FixtureHist::th1f("m_ll_bkg", &[60.0, 80.0, 100.0, 120.0], &[20.0, 20.0, 20.0]));
    b.add_hist(
        "",
        FixtureHist::th2d("eta_phi", (&[-2.5, 0.0, 2.5], &[-3.2, 0.0, 3.2]), &[1.0, 2.0, 3.0, 4.0])
            .with_axis_titles("#eta", "#phi", ""),
    );
    let path = dir.join("histos.root");
    std::fs::write(&path, b.build()).unwrap();
    path
}

fn input(spec: &str, file: &Path) -> InputSpec {
    let (nick, object) = spec.split_once(':').unwrap();
    format!("{nick}={}:{object}", file.display()).parse().unwrap()
}

fn pipeline() -> Pipeline {
    let mut p = Pipeline::new();
    p.add_input(RootInput::new()).add_analysis(NormalizeToUnity::new()).add_plot(RootPlot::new());
    p
}

#[test]
fn overlay_written_in_every_format() {
    let dir = scratch_dir("overlay");
    let file = write_fixture(&dir);
    let mut dict = PlotDict {
        inputs: vec![input("sig:sr/m_ll", &file), input("bkg:sr/m_ll_bkg", &file)],
        x_label: "m_{ll} [GeV]".into(),
        title: Some("Z peak".into()),
        output_dir: dir.join("out"),
        filename: "mll".into(),
        formats: vec![OutputFormat::Svg, OutputFormat::Png],
        ..Default::default()
    };
    dict.labels.insert("sig".into(), "Signal".into());

    let mut data = PlotData::new(dict);
    pipeline().execute(&mut data).unwrap();

    assert_eq!(data.root_histos.keys().collect::<Vec<_>>(), ["sig", "bkg"]);
    let svg = std::fs::read_to_string(dir.join("out/mll.svg")).unwrap();
    for text in ["m_{ll} [GeV]", "Events", "Signal", "m_ll_bkg", "Z peak"] {
        assert!(svg.contains(&format!(">{text}</text>")), "missing {text}");
    }
    let png = std::fs::read(dir.join("out/mll.png")).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn normalize_scales_loaded_histograms() {
    let dir = scratch_dir("norm");
    let file = write_fixture(&dir);
    let dict = PlotDict {
        inputs: vec![input("sig:sr/m_ll", &file)],
        normalize: true,
        output_dir: dir.clone(),
        formats: vec![OutputFormat::Svg],
        ..Default::default()
    };
    let mut data = PlotData::new(dict);
    pipeline().execute(&mut data).unwrap();

    let h = &data.root_histos["sig"];
    approx::assert_relative_eq!(h.integral(), 1.0);
    approx::assert_relative_eq!(h.bin_content(2, 0, 0), 2.0 / 3.0);
    assert!(dir.join("plot.svg").is_file());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn two_dimensional_map_uses_theme_and_log_z() {
    let dir = scratch_dir("map");
    let file = write_fixture(&dir);
    let dict = PlotDict {
        inputs: vec![input("map:eta_phi", &file)],
        z_log: true,
        z_label: "entries".into(),
        x_label: String::new(),
        output_dir: dir.clone(),
        formats: vec![OutputFormat::Svg],
        ..Default::default()
    };
    let config = resolve_config("minimal", Some("grid:\n  show: true\n")).unwrap();
    let mut p = Pipeline::new();
    p.add_input(RootInput::new()).add_plot(RootPlot::with_config(config));
    p.execute(&mut PlotData::new(dict)).unwrap();

    let svg = std::fs::read_to_string(dir.join("plot.svg")).unwrap();
    assert!(svg.contains(">entries</text>"));
    assert!(svg.contains(">#eta</text>"));
    assert!(svg.contains("stroke-dasharray"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn inputs_interleaved_across_files_keep_their_order() {
    let dir = scratch_dir("two-files");
    let first = write_fixture(&dir);
    let mut b = RootFileBuilder::new("other.root");
    b.add_hist("", FixtureHist::th1d("pt", &[0.0, 50.0, 100.0], &[7.0, 3.0]));
    let second = dir.join("other.root");
    std::fs::write(&second, b.build()).unwrap();

    let dict = PlotDict {
        inputs: vec![
            input("sig:sr/m_ll", &first),
            input("pt:pt", &second),
            input("bkg:sr/m_ll_bkg", &first),
        ],
        ..Default::default()
    };
    let mut data = PlotData::new(dict);
    let mut root_input = RootInput::new();
    root_input.prepare_args(&mut data).unwrap();
    root_input.run(&mut data).unwrap();

    assert_eq!(data.root_histos.keys().collect::<Vec<_>>(), ["sig", "pt", "bkg"]);
    assert_eq!(data.root_histos["pt"].integral(), 10.0);
    assert_eq!(data.root_histos["bkg"].class_name, "TH1F");
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn duplicate_nicks_fail_before_anything_is_read() {
    let dict = PlotDict {
        inputs: vec![
            "h=/nonexistent.root:a".parse().unwrap(),
            "h=/nonexistent.root:b".parse().unwrap(),
        ],
        ..Default::default()
    };
    let err = pipeline().execute(&mut PlotData::new(dict)).unwrap_err();
    assert!(matches!(err, PlotError::InvalidArgs(_)), "{err}");
}

#[test]
fn missing_inputs_surface_root_errors() {
    let dir = scratch_dir("missing");
    let file = write_fixture(&dir);
    for spec in [input("x:sr/nope", &file), "x=/no/such/file.root:h".parse().unwrap()] {
        let dict = PlotDict { inputs: vec![spec], output_dir: dir.clone(), ..Default::default() };
        let err = pipeline().execute(&mut PlotData::new(dict)).unwrap_err();
        assert!(matches!(err, PlotError::Root(_)), "{err}");
    }
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn no_inputs_means_nothing_to_plot() {
    let dir = scratch_dir("empty");
    let dict = PlotDict { output_dir: dir.clone(), ..Default::default() };
    let err = pipeline().execute(&mut PlotData::new(dict)).unwrap_err();
    assert!(matches!(err, PlotError::NothingToPlot));
    let _ = std::fs::remove_dir_all(dir);
}
