//! IOC 규칙 평가 벤치마크
//!
//! 레코드 하나에 대한 규칙 집합 평가와 CSV 판독 처리량을 측정합니다.

use chrono::TimeZone;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use procwatch_core::types::Record;
use procwatch_detector::{IndicatorSet, RecordReader};

fn create_record(cmdline: &str, username: &str) -> Record {
    Record {
        id: 1,
        timestamp: chrono::Utc
            .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .single()
            .unwrap_or_default(),
        cmdline: cmdline.split_whitespace().map(str::to_owned).collect(),
        username: username.to_owned(),
        exit_code: 0,
        ppid: 1,
        pid: 4242,
        auid: 1000,
        uid: 1000,
        gid: 1000,
        euid: 1000,
        suid: 1000,
        fsuid: 1000,
        egid: 1000,
        sgid: 1000,
        fsgid: 1000,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let set = IndicatorSet::default();
    let cases = [
        ("no_match", create_record("ls -la /home/alice", "alice")),
        (
            "metadata",
            create_record("curl http://169.254.169.254/latest/meta-data/", "ec2-user"),
        ),
        (
            "cookie",
            create_record("sudo curl -b cookies.txt https://bank.example/login", "alice"),
        ),
        ("sensitive_file", create_record("cat /etc/shadow", "root")),
        (
            "download",
            create_record(
                "wget https://raw.githubusercontent.com/acme/tools/main/install.sh",
                "alice",
            ),
        ),
    ];

    let mut group = c.benchmark_group("evaluate");
    for (name, record) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), record, |b, record| {
            b.iter(|| set.evaluate(black_box(record)))
        });
    }
    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");

    for rows in [100usize, 1_000, 10_000] {
        let mut input = String::from(
            "id,timestamp,cmdline,username,exit,ppid,pid,auid,uid,gid,euid,suid,fsuid,egid,sgid,fsgid\n",
        );
        for i in 0..rows {
            input.push_str(&format!(
                "{i},2024-01-15 12:00:00+00,curl+-s+https%3A%2F%2Fexample.com%2F{i},alice,0,1,2,3,4,5,6,7,8,9,10,11\n"
            ));
        }

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                RecordReader::new(input.as_bytes())
                    .filter_map(Result::ok)
                    .count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_reader);
criterion_main!(benches);
