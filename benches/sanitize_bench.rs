// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use cellsan::{extract_lines, is_safe_url, Sanitizer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sanitize_benchmark(c: &mut Criterion) {
    let sanitizer = Sanitizer::new();
    let clean = r#"<p>Invoice <b>#1024</b><br>Due: <i>30 days</i></p>"#;
    let hostile = r#"
        <div onclick="steal()" style="color:red">
            <section><script>alert(1)</script><p>kept</p></section>
            <a href="javascript:alert(1)" target="_blank">x</a>
            <img src="data:image/png;base64,AAAA" onerror="alert(1)">
            <!-- comment --><table><caption>c</caption><tr><td>1</td></tr></table>
        </div>
    "#;

    c.bench_function("sanitize_clean_cell", |b| {
        b.iter(|| black_box(sanitizer.sanitize(black_box(clean))))
    });

    c.bench_function("sanitize_hostile_cell", |b| {
        b.iter(|| black_box(sanitizer.sanitize(black_box(hostile))))
    });
}

fn url_policy_benchmark(c: &mut Criterion) {
    let urls = vec![
        "https://example.com/invoice/12",
        "javascript:alert(1)",
        "data:image/png;base64,iVBORw0KGgo=",
        "/relative/path",
    ];

    c.bench_function("url_policy_check", |b| {
        b.iter(|| {
            for url in &urls {
                black_box(is_safe_url(url));
            }
        })
    });
}

fn extract_benchmark(c: &mut Criterion) {
    let cell = "line one<br>line two<BR/>line three<br />".repeat(20);

    c.bench_function("extract_lines", |b| b.iter(|| black_box(extract_lines(&cell))));
}

criterion_group!(benches, sanitize_benchmark, url_policy_benchmark, extract_benchmark);
criterion_main!(benches);
