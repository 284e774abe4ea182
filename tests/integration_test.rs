//! End-to-end tests over a synthetic monthly archive

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::LevelFilter;

use nightkit::compression::CompressionKind;
use nightkit::raster::SampleType;
use nightkit::tiff::GeoKeys;
use nightkit::utils::logger::Logger;
use nightkit::{
    GeoTransform, NightError, NightKit, PipelineConfig, Raster, RasterProfile, RasterReader, RasterWriter, TiffReader,
};

const SUFFIX: &str = ".avg_rade9h.tif";

/// 300x300 Float32 raster with 0.005° pixels, top-left corner at (-89, 41)
fn archive_raster(month: u32) -> Raster {
    let profile = RasterProfile {
        width: 300,
        height: 300,
        sample_type: SampleType::F32,
        transform: GeoTransform::from_gdal([-89.0, 0.005, 0.0, 41.0, 0.0, -0.005]),
        geo_keys: GeoKeys {
            directory: vec![1, 1, 0, 3, 1024, 0, 1, 2, 1025, 0, 1, 1, 2048, 0, 1, 4326],
            doubles: Vec::new(),
            ascii: Some("WGS 84|".to_string()),
        },
        nodata: None,
    };
    let data = (0..300 * 300).map(|i| month as f64 * 10.0 + (i % 7) as f64).collect();
    Raster::new(profile, data)
}

fn write_archive(dir: &Path, months: &[u32]) {
    let writer = RasterWriter::new(CompressionKind::Deflate);
    for &month in months {
        let name = format!("SVDNB_npp_2016{:02}01-2016{:02}28_75N180W_vcmslcfg_v10_c201602181130{}", month, month, SUFFIX);
        writer.write(&dir.join(name), &archive_raster(month)).unwrap();
    }
    fs::write(dir.join(format!("SVDNB_npp_2016ab01_broken{}", SUFFIX)), b"not a tiff").unwrap();
}

fn toolkit(archive: &Path, output: &Path) -> NightKit {
    let mut config = PipelineConfig::default();
    config.archive.directory = archive.to_path_buf();
    config.output.directory = output.to_path_buf();
    config.logging.file = None;
    NightKit::with_logger(config, Logger::without_file(LevelFilter::Info))
}

fn request_json(length: u32, breadth: u32, from: &str, to: &str) -> String {
    format!(
        r#"{{"latitude": 40.1023, "longitude": -88.2275, "length": {}, "breadth": {}, "from_date": "{}", "to_date": "{}"}}"#,
        length, breadth, from, to
    )
}

fn tif_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |e| e == "tif"))
        .collect();
    files.sort();
    files
}

#[test]
fn three_month_request_yields_three_chronological_frames() {
    let archive = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("Extracted_images");
    write_archive(archive.path(), &[1, 2, 3, 4]);
    let kit = toolkit(archive.path(), &output);

    let request = kit.validate_request(&request_json(100_000, 100_000, "01-2016", "03-2016")).unwrap();
    let report = kit.run(&request).unwrap();

    let names: Vec<String> = tif_files(&output)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["frame_001.tif", "frame_002.tif", "frame_003.tif"]);
    assert_eq!(report.frames, tif_files(&output));
    assert!(report.plot_path.is_file());
    assert_eq!(report.plot_path, output.join("graph.png"));
    assert_eq!(report.plot_points, 3);

    let dates: Vec<NaiveDate> = report.series.samples().iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![
        NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2016, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2016, 3, 1).unwrap(),
    ]);
    let means: Vec<f64> = report.series.samples().iter().map(|s| s.mean_value).collect();
    assert!(means[0] < means[1] && means[1] < means[2]);

    let csv = fs::read_to_string(output.join("intensity.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("date,mean\n2016-01,"));

    // Relabeled frames are normalized and still in date order
    let mut frame_means = Vec::new();
    for path in &report.frames {
        let raster = RasterReader::open(path).unwrap().read_all().unwrap();
        assert_eq!((raster.width(), raster.height()), (200, 200));
        assert_eq!(raster.profile.sample_type, SampleType::F32);
        assert_eq!(raster.profile.geo_keys, archive_raster(1).profile.geo_keys);
        frame_means.push(raster.mean().unwrap());
    }
    assert!(frame_means[0] < frame_means[1] && frame_means[1] < frame_means[2]);
    let overall: f64 = frame_means.iter().sum::<f64>() / 3.0;
    assert!(overall.abs() < 1e-4);
    assert_eq!(report.statistics.pixel_count, 3 * 200 * 200);
}

#[test]
fn sub_pixel_request_fails_without_frames() {
    let archive = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("out");
    write_archive(archive.path(), &[1, 2]);
    let kit = toolkit(archive.path(), &output);

    let request = kit.validate_request(&request_json(400, 400, "01-2016", "02-2016")).unwrap();
    let err = kit.run(&request).unwrap_err();

    assert!(matches!(err, NightError::InvalidWindow { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(tif_files(&output).is_empty());
}

#[test]
fn empty_range_leaves_empty_output() {
    let archive = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("out");
    write_archive(archive.path(), &[1, 2]);
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("frame_001.tif"), b"stale").unwrap();
    let kit = toolkit(archive.path(), &output);

    let request = kit.validate_request(&request_json(10_000, 10_000, "06-2016", "08-2016")).unwrap();
    let err = kit.run(&request).unwrap_err();

    assert!(matches!(err, NightError::EmptyResult { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(output.is_dir());
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}

#[test]
fn invalid_request_reports_every_problem() {
    let kit = toolkit(Path::new("."), Path::new("unused"));
    let err = kit
        .validate_request(r#"{"latitude": 120, "longitude": -88, "length": 0, "breadth": 10, "from_date": "01-2016", "to_date": "13-2016"}"#)
        .unwrap_err();

    match &err {
        NightError::Validation(problems) => assert_eq!(problems.len(), 3),
        other => panic!("unexpected {}", other),
    }
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn select_ignores_malformed_names() {
    let archive = tempfile::tempdir().unwrap();
    write_archive(archive.path(), &[1, 2, 3, 4]);
    let kit = toolkit(archive.path(), Path::new("unused"));

    let entries = kit
        .select(NaiveDate::from_ymd_opt(2016, 2, 1).unwrap(), NaiveDate::from_ymd_opt(2016, 12, 1).unwrap())
        .unwrap();
    assert_eq!(entries.len(), 3);
}

#[test]
fn describe_reports_archive_frame() {
    let archive = tempfile::tempdir().unwrap();
    let path = archive.path().join("scene.tif");
    RasterWriter::new(CompressionKind::Deflate).write(&path, &archive_raster(2)).unwrap();
    let kit = toolkit(archive.path(), Path::new("unused"));

    let summary = kit.describe(&path).unwrap();
    assert_eq!((summary.profile.width, summary.profile.height), (300, 300));
    assert_eq!(summary.raster_type(), "PixelIsArea");
    assert_eq!(summary.nodata_pixels, 0);
    assert!(summary.to_string().contains("Size: 300x300"));
}

#[test]
fn archive_frames_parse_from_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.tif");
    RasterWriter::new(CompressionKind::None).write(&path, &archive_raster(5)).unwrap();

    let mut cursor = Cursor::new(fs::read(&path).unwrap());
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    assert!(!tiff.is_big_tiff);
    assert_eq!(tiff.ifds.len(), 1);
    assert!(tiff.main_ifd().unwrap().has_tag(nightkit::tiff::constants::tags::GEO_KEY_DIRECTORY_TAG));
}
