use crate::portfolio::equity::EquityCurve;
use crate::portfolio::PortfolioPosition;
use crate::pricing::Greeks;

/// Sample standard deviations below this are treated as zero dispersion.
const MIN_STD: f64 = 1e-12;

/// One-pass aggregate of a marked book. Every field defaults to zero for
/// an empty book; nothing here is NaN-able.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PortfolioSummary {
    pub position_count: usize,
    pub total_market_value: f64,
    pub total_cost_basis: f64,
    pub total_unrealized_pnl: f64,
    pub total_unrealized_pnl_percent: f64,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub net_greeks: Greeks,
}

/// Fold a marked book into display aggregates. The equity curve is the
/// only time-ordered input; everything else is order-independent.
pub fn summarize(positions: &[PortfolioPosition], equity: Option<&EquityCurve>) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        position_count: positions.len(),
        ..PortfolioSummary::default()
    };

    let mut win_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut returns: Vec<f64> = Vec::with_capacity(positions.len());

    for pos in positions {
        summary.total_market_value += pos.market_value;
        summary.total_cost_basis += pos.avg_price * pos.quantity;
        summary.total_unrealized_pnl += pos.unrealized_pnl;
        returns.push(pos.unrealized_pnl_percent);

        if pos.unrealized_pnl > 0.0 {
            summary.win_count += 1;
            win_sum += pos.unrealized_pnl;
        } else if pos.unrealized_pnl < 0.0 {
            summary.loss_count += 1;
            loss_sum += pos.unrealized_pnl.abs();
        }

        if let Some(greeks) = &pos.greeks {
            summary.net_greeks.add(&greeks.scaled(pos.signed_quantity()));
        }
    }

    if summary.total_cost_basis.abs() > f64::EPSILON {
        summary.total_unrealized_pnl_percent =
            summary.total_unrealized_pnl / summary.total_cost_basis * 100.0;
    }
    if summary.position_count > 0 {
        summary.win_rate = summary.win_count as f64 / summary.position_count as f64;
    }
    if summary.win_count > 0 {
        summary.avg_win = win_sum / summary.win_count as f64;
    }
    if summary.loss_count > 0 {
        summary.avg_loss = loss_sum / summary.loss_count as f64;
    }

    summary.sharpe_ratio = sharpe_of(&returns);
    summary.max_drawdown = equity.map(EquityCurve::max_drawdown).unwrap_or(0.0);

    tracing::debug!(
        positions = summary.position_count,
        pnl = summary.total_unrealized_pnl,
        win_rate = summary.win_rate,
        "portfolio summarized"
    );
    summary
}

/// Cross-sectional Sharpe over per-position percent returns: mean over
/// sample standard deviation, no annualization. Fewer than two returns or
/// near-zero dispersion yields zero.
fn sharpe_of(returns: &[f64]) -> f64 {
    let n = returns.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = returns.iter().sum::<f64>() / nf;
    let var = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (nf - 1.0);
    let std = var.sqrt();
    if std < MIN_STD {
        return 0.0;
    }
    mean / std
}
