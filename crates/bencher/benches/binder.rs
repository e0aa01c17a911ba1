use std::hint::black_box;

use bencher::{TestCase, TestFile};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use http::header::CONTENT_TYPE;
use http::Request;
use http_body_util::Full;
use micro_binder::{Binder, FileHeader, FormRecord};
use serde::Deserialize;

static SMALL_FORM: TestFile = TestFile::new("small_form", "name=micro&age=3&admin=true");
static SLICE_FORM: TestFile = TestFile::new(
    "slice_form",
    "ids=1&ids=2&ids=3&ids=4&ids=5&ids=6&ids=7&ids=8&ids=9&ids=10&ids=11&ids=12&ids=13&ids=14&ids=15&ids=16",
);
static MULTIPART_FORM: TestFile = TestFile::new(
    "multipart_form",
    "--X-BOUNDARY\r\n\
     Content-Disposition: form-data; name=\"name\"\r\n\r\n\
     micro\r\n\
     --X-BOUNDARY\r\n\
     Content-Disposition: form-data; name=\"avatar\"; filename=\"avatar.txt\"\r\n\
     Content-Type: text/plain\r\n\r\n\
     0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef\r\n\
     --X-BOUNDARY--\r\n",
);

#[derive(Deserialize, FormRecord, Default)]
struct Profile {
    #[form(key = "name")]
    name: String,
    #[form(key = "age")]
    age: u8,
    #[form(key = "admin")]
    admin: bool,
    #[form(key = "ids")]
    ids: Vec<u64>,
    #[form(key = "avatar")]
    #[serde(skip)]
    avatar: Option<FileHeader>,
}

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::urlencoded("small_urlencoded", SMALL_FORM),
        TestCase::urlencoded("slice_urlencoded", SLICE_FORM),
        TestCase::new("multipart", "multipart/form-data; boundary=X-BOUNDARY", MULTIPART_FORM),
    ]
}

fn benchmark_bind(criterion: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime should build");
    let binder = Binder::default();
    let mut group = criterion.benchmark_group("bind");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::new(case.name(), case.file().file_name()), &case, |b, case| {
            b.iter(|| {
                let request = Request::builder()
                    .header(CONTENT_TYPE, case.content_type())
                    .body(Full::new(Bytes::from_static(case.file().content().as_bytes())))
                    .expect("request should build");

                let mut profile = Profile::default();
                runtime.block_on(binder.bind(request, &mut profile)).expect("body should bind");
                black_box(profile);
            });
        });
    }

    group.finish();
}

criterion_group!(binder, benchmark_bind);
criterion_main!(binder);
