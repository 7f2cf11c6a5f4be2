//! # Templates Maud — Página do Índice de Qualidade do Ar
//!
//! Uma única página completa, renderizada no servidor com o resultado da
//! leitura inicial já preenchido.
//!
//! ```text
//! ┌──────────── header ─────────────────────────────┐
//! │ Controle Difuso de Qualidade do Ar              │
//! ├──────────────────────┬──────────────────────────┤
//! │ CO2  ═══════●══════  │ Índice: ████████░░ 250   │
//! │ H2   ════●═════════  │ Categoria: Regular       │
//! │ CO   ══════●═══════  │                          │
//! │ O2   ═════════●════  │                          │
//! │ Família [triangular] │                          │
//! ├──────────────────────┴──────────────────────────┤
//! │ [co2Chart] [h2Chart] [coChart] [o2Chart] [air…] │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## JavaScript Inline
//!
//! - `input` dos sliders com debounce de 100 ms → `POST /evaluate`
//! - troca de família → `GET /curves?family=` e nova avaliação
//! - cada canvas desenha as curvas dos termos e uma linha vertical no
//!   valor atual (para a saída, o índice calculado)

use chrono::Datelike;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::controller::{AirQualityReport, MembershipFamily, Reading};
use crate::fuzzy::{FuzzySystem, FuzzyVariable};

/// Passo do slider: décimos para domínios estreitos (O2), unidades no resto.
fn slider_step(variable: &FuzzyVariable) -> f64 {
    if variable.max() - variable.min() <= 10.0 {
        0.1
    } else {
        1.0
    }
}

fn family_label(family: MembershipFamily) -> &'static str {
    match family {
        MembershipFamily::Triangular => "Triangular",
        MembershipFamily::Trapezoidal => "Trapezoidal",
        MembershipFamily::Gaussian => "Gaussiana",
    }
}

/// Barra e rótulo de resultado.
fn result_panel(report: Option<&AirQualityReport>) -> Markup {
    html! {
        div class="results" {
            h3 { "Índice de Qualidade do Ar" }
            div class="meter" {
                @match report {
                    Some(r) => {
                        div #quality-bar
                            class={ "bar air-quality " (r.category.css_class()) }
                            style={ "width: " (r.percentage) "%" } {
                            (r.index) " (" (r.percentage) "%)"
                        }
                    }
                    None => {
                        div #quality-bar class="bar air-quality" style="width: 0%" { "—" }
                    }
                }
            }
            div class="quality-indicator" {
                span class="indicator-label" { "Categoria: " }
                span #quality-text {
                    @if let Some(r) = report { (r.category.label()) } @else { "—" }
                }
            }
        }
    }
}

/// Página completa.
///
/// `system` fornece domínios e nomes das variáveis (sliders e canvases);
/// `reading` é a posição inicial dos sliders; `initial`, o resultado dela.
pub fn full_page(
    system: &FuzzySystem,
    family: MembershipFamily,
    reading: Reading,
    initial: Option<&AirQualityReport>,
) -> Markup {
    let year = chrono::Local::now().year();
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Controle Difuso de Qualidade do Ar" }
                link rel="stylesheet" href="/assets/style.css";
            }
            body {
                div class="container" {
                    header {
                        h1 { "Sistema de Controle Difuso para Qualidade do Ar" }
                    }

                    main {
                        section class="input-section" {
                            h2 { "Parâmetros de Entrada" }
                            form #fuzzy-form onsubmit="return false;" {
                                @for variable in system.inputs() {
                                    @let value = reading.value(variable.name()).unwrap_or(variable.midpoint());
                                    div class="form-group" {
                                        label for=(variable.name()) {
                                            (variable.name().to_uppercase()) " (PPM):"
                                        }
                                        input type="range"
                                            id=(variable.name())
                                            name=(variable.name())
                                            min=(variable.min())
                                            max=(variable.max())
                                            step=(slider_step(variable))
                                            value=(value);
                                        span id={ (variable.name()) "Value" } { (value) " PPM" }
                                    }
                                }
                                div class="form-group" {
                                    label for="family" { "Função de Pertinência:" }
                                    select #family name="family" {
                                        @for choice in MembershipFamily::ALL {
                                            option value=(choice.as_str()) selected[choice == family] {
                                                (family_label(choice))
                                            }
                                        }
                                    }
                                }
                            }
                        }

                        section class="output-section" {
                            h2 { "Resultado" }
                            (result_panel(initial))
                        }

                        section class="charts-section" {
                            h2 { "Visualização Difusa" }
                            div class="charts-container" {
                                @for variable in system.inputs().iter().chain(system.outputs()) {
                                    div class="chart-wrapper" {
                                        h3 { "Pertinência de " (variable.name()) }
                                        canvas id={ (variable.name()) "Chart" } width="420" height="220" {}
                                    }
                                }
                            }
                        }
                    }

                    footer {
                        p { "Sistema de Controle Difuso para Qualidade do Ar © " (year) }
                    }
                }
                (PreEscaped(SCRIPT))
            }
        }
    }
}

const SCRIPT: &str = r#"<script>
var debounceTimer = null;
var curves = null;
var lastIndex = null;
var inputs = ['co2', 'h2', 'co', 'o2'];
var colors = ['#3498db', '#2ecc71', '#e74c3c', '#9b59b6', '#f39c12'];

function currentValue(name) {
  if (name === 'air_quality') return lastIndex;
  var el = document.getElementById(name);
  return el ? parseFloat(el.value) : null;
}

function drawChart(variable) {
  var canvas = document.getElementById(variable.name + 'Chart');
  if (!canvas) return;
  var ctx = canvas.getContext('2d');
  var w = canvas.width, h = canvas.height, pad = 20;
  var sx = function(x) { return pad + (x - variable.min) / (variable.max - variable.min) * (w - 2 * pad); };
  var sy = function(y) { return h - pad - y * (h - 2 * pad); };
  ctx.clearRect(0, 0, w, h);
  ctx.strokeStyle = '#999';
  ctx.strokeRect(pad, pad, w - 2 * pad, h - 2 * pad);
  variable.terms.forEach(function(term, i) {
    ctx.strokeStyle = colors[i % colors.length];
    ctx.lineWidth = 2;
    ctx.beginPath();
    term.points.forEach(function(p, j) {
      if (j === 0) ctx.moveTo(sx(p.x), sy(p.y)); else ctx.lineTo(sx(p.x), sy(p.y));
    });
    ctx.stroke();
    ctx.fillStyle = colors[i % colors.length];
    ctx.fillText(term.name, pad + 4 + i * 80, pad - 6);
  });
  var value = currentValue(variable.name);
  if (value !== null && !isNaN(value)) {
    ctx.strokeStyle = '#000';
    ctx.setLineDash([4, 4]);
    ctx.beginPath();
    ctx.moveTo(sx(value), sy(0));
    ctx.lineTo(sx(value), sy(1));
    ctx.stroke();
    ctx.setLineDash([]);
  }
}

function drawCharts() {
  if (curves) curves.variables.forEach(drawChart);
}

function loadCurves() {
  var family = document.getElementById('family').value;
  return fetch('/curves?family=' + encodeURIComponent(family), { cache: 'no-store' })
    .then(function(r) { return r.json(); })
    .then(function(data) { curves = data; drawCharts(); });
}

function evaluate() {
  var body = new URLSearchParams();
  inputs.forEach(function(name) { body.append(name, document.getElementById(name).value); });
  body.append('family', document.getElementById('family').value);
  fetch('/evaluate', { method: 'POST', body: body, cache: 'no-store' })
    .then(function(r) {
      if (!r.ok) throw new Error('HTTP ' + r.status);
      return r.json();
    })
    .then(function(report) {
      var bar = document.getElementById('quality-bar');
      bar.style.width = report.percentage + '%';
      bar.textContent = report.index + ' (' + report.percentage + '%)';
      bar.className = 'bar air-quality ' + categoryClass(report.index);
      document.getElementById('quality-text').textContent = report.category;
      lastIndex = report.index;
      drawCharts();
    })
    .catch(function(e) { console.error('falha na avaliação', e); });
}

function categoryClass(index) {
  if (index <= 100) return 'quality-optimal';
  if (index <= 200) return 'quality-good';
  if (index <= 300) return 'quality-regular';
  if (index <= 400) return 'quality-poor';
  return 'quality-harmful';
}

document.addEventListener('DOMContentLoaded', function() {
  inputs.forEach(function(name) {
    document.getElementById(name).addEventListener('input', function() {
      document.getElementById(name + 'Value').textContent = this.value + ' PPM';
      clearTimeout(debounceTimer);
      debounceTimer = setTimeout(evaluate, 100);
    });
  });
  document.getElementById('family').addEventListener('change', function() {
    loadCurves().then(evaluate);
  });
  loadCurves().then(evaluate);
});
</script>"#;
