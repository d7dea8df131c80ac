// ABOUTME: Benchmark suite for MMS PDU parsing and composition
// ABOUTME: Measures m-send-req encoding, decoding of every body size, and header-only PDUs

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mms_pdu::datatypes::{ContentType, MmsVersion, Status};
use mms_pdu::{NotifyRespInd, Pdu, PduComposer, PduParser, PduPart, SendReq};
use std::time::Duration;

fn create_sample_send_req(image_size: usize) -> SendReq {
    let image = PduPart::builder(ContentType::new("image/jpeg"))
        .content_location("image_0.jpg")
        .content_id("image_0")
        .data(vec![0xA5u8; image_size])
        .build()
        .unwrap();
    SendReq::builder()
        .transaction_id("BENCH0001")
        .mms_version(MmsVersion::V1_3)
        .date(1_700_000_000)
        .to("+15551234567")
        .to("someone@example.com")
        .subject("Benchmark")
        .part(PduPart::text("Hello World"))
        .part(image)
        .build()
        .unwrap()
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.measurement_time(Duration::from_secs(10));

    let send_req = create_sample_send_req(1024);
    let composer = PduComposer::new();
    group.bench_function("send_req", |b| {
        b.iter(|| composer.make(black_box(&send_req)).unwrap())
    });

    let notify_resp = Pdu::from(NotifyRespInd::new("BENCH0001", Status::Retrieved));
    group.bench_function("notify_resp_ind", |b| {
        b.iter(|| composer.compose(black_box(&notify_resp)).unwrap())
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.measurement_time(Duration::from_secs(10));

    let composer = PduComposer::new();
    let send_req_bytes = composer.make(&create_sample_send_req(1024)).unwrap();
    group.bench_function("send_req", |b| {
        b.iter(|| PduParser::new(black_box(&send_req_bytes)).parse().unwrap())
    });

    let notify_resp_bytes = composer
        .compose(&Pdu::from(NotifyRespInd::new("BENCH0001", Status::Retrieved)))
        .unwrap();
    group.bench_function("notify_resp_ind", |b| {
        b.iter(|| PduParser::new(black_box(&notify_resp_bytes)).parse().unwrap())
    });

    group.finish();
}

fn bench_message_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_sizes");
    let composer = PduComposer::new();

    for size in [0usize, 1024, 64 * 1024, 300 * 1024] {
        let send_req = create_sample_send_req(size);
        let bytes = composer.make(&send_req).unwrap();

        group.bench_with_input(BenchmarkId::new("compose", size), &send_req, |b, req| {
            b.iter(|| composer.make(black_box(req)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parse", size), &bytes, |b, bytes| {
            b.iter(|| PduParser::new(black_box(bytes)).parse().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compose, bench_parse, bench_message_sizes);
criterion_main!(benches);
